//! Tuning constants and configuration for set analysis.
//!
//! Every tuned value in the pipeline has a named constant here and a
//! corresponding [`AnalysisConfig`] field. The scale factors were calibrated
//! together on normalized pose coordinates; changing one in isolation shifts
//! score distributions for downstream consumers.

use rlens_models::Rpe;
use serde::{Deserialize, Serialize};

/// Behavior version of the tuned pipeline. Bump alongside any change to the
/// constants below.
pub const ANALYSIS_VERSION: u32 = 1;

/// Samples a landmark needs to pass the visibility filter.
pub const MIN_VISIBLE_SAMPLES: usize = 10;

/// Vertical span (normalized units) a landmark must cover to count as moving.
pub const MIN_MOTION_SPAN: f64 = 0.02;

/// Samples required by the relaxed fallback election.
pub const RELAXED_MIN_SAMPLES: usize = 2;

/// Moving-average window applied to the selected trajectory, in frames.
pub const SMOOTHING_WINDOW: usize = 5;

/// Lower bound for the rep detector's hysteresis threshold.
pub const THRESHOLD_FLOOR: f64 = 0.003;

/// Fraction of the smoothed signal's global range used as the threshold.
pub const THRESHOLD_RANGE_FRACTION: f64 = 0.01;

/// Reps shorter than this are discarded as jitter, in seconds.
pub const MIN_REP_DURATION_SEC: f64 = 0.5;

/// Mid-rep speed below this fraction of peak speed flags a stall.
pub const STALL_RATIO: f64 = 0.5;

/// Scale turning speed variance into the 0-100 smoothness score.
pub const SMOOTHNESS_VARIANCE_SCALE: f64 = 10_000.0;

/// Scale turning normalized distances into report distance units.
pub const DISTANCE_SCALE: f64 = 100.0;

/// Weight of range-of-motion mismatch in the asymmetry score.
pub const ASYMMETRY_ROM_WEIGHT: f64 = 500.0;

/// Weight of mean left/right gap in the asymmetry score.
pub const ASYMMETRY_GAP_WEIGHT: f64 = 300.0;

/// Maximum reps per collage; longer sets are sampled first4/last4.
pub const REPS_PER_COLLAGE: usize = 4;

/// Square cell edge of a collage grid, in pixels.
pub const COLLAGE_CELL_SIZE: u32 = 256;

/// JPEG quality for written collage images.
pub const COLLAGE_JPEG_QUALITY: u8 = 95;

/// Configuration for the set analysis pipeline.
///
/// [`Default`] reproduces the production tuning; construct a custom value to
/// experiment with individual stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Samples a landmark needs before the visibility filter trusts it.
    pub min_visible_samples: usize,

    /// Vertical span (normalized) a landmark must cover to count as moving.
    pub min_motion_span: f64,

    /// Samples required by the relaxed fallback when no landmark passes.
    pub relaxed_min_samples: usize,

    /// Moving-average window width in frames.
    pub smoothing_window: usize,

    /// Hysteresis threshold floor for the rep detector.
    pub threshold_floor: f64,

    /// Fraction of the global smoothed range added to the threshold.
    pub threshold_range_fraction: f64,

    /// Minimum rep duration in seconds; shorter detections are dropped.
    pub min_rep_duration_sec: f64,

    /// Fraction of peak speed below which the mid-rep speed flags a stall.
    pub stall_ratio: f64,

    /// Speed-variance scale for the smoothness score.
    pub smoothness_variance_scale: f64,

    /// Distance scale applied to normalized ROM and path deviation.
    pub distance_scale: f64,

    /// Asymmetry weight for range-of-motion mismatch.
    pub asymmetry_rom_weight: f64,

    /// Asymmetry weight for mean left/right gap.
    pub asymmetry_gap_weight: f64,

    /// Duration bands mapping rep time to RPE.
    pub effort_bands: EffortBands,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_visible_samples: MIN_VISIBLE_SAMPLES,
            min_motion_span: MIN_MOTION_SPAN,
            relaxed_min_samples: RELAXED_MIN_SAMPLES,
            smoothing_window: SMOOTHING_WINDOW,
            threshold_floor: THRESHOLD_FLOOR,
            threshold_range_fraction: THRESHOLD_RANGE_FRACTION,
            min_rep_duration_sec: MIN_REP_DURATION_SEC,
            stall_ratio: STALL_RATIO,
            smoothness_variance_scale: SMOOTHNESS_VARIANCE_SCALE,
            distance_scale: DISTANCE_SCALE,
            asymmetry_rom_weight: ASYMMETRY_ROM_WEIGHT,
            asymmetry_gap_weight: ASYMMETRY_GAP_WEIGHT,
            effort_bands: EffortBands::canonical(),
        }
    }
}

/// Duration-to-RPE lookup bands.
///
/// Bands are `(minimum seconds, RPE)` pairs evaluated top-down; the first
/// band whose minimum the duration meets wins, and `floor` covers everything
/// faster than the last band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortBands {
    bands: Vec<(f64, Rpe)>,
    floor: Rpe,
}

impl EffortBands {
    /// The production bands: half an RPE point per half second of grind,
    /// from 1.0s (7.5) up to 3.5s (10.0).
    pub fn canonical() -> Self {
        Self {
            bands: vec![
                (3.5, Rpe::Ten),
                (3.0, Rpe::NineFive),
                (2.5, Rpe::Nine),
                (2.0, Rpe::EightFive),
                (1.5, Rpe::Eight),
                (1.0, Rpe::SevenFive),
            ],
            floor: Rpe::Seven,
        }
    }

    /// Custom bands, evaluated in the order given.
    pub fn new(bands: Vec<(f64, Rpe)>, floor: Rpe) -> Self {
        Self { bands, floor }
    }

    /// RPE for a rep of the given duration.
    pub fn rpe_for(&self, duration_sec: f64) -> Rpe {
        self.bands
            .iter()
            .find(|(min_sec, _)| duration_sec >= *min_sec)
            .map(|(_, rpe)| *rpe)
            .unwrap_or(self.floor)
    }
}

impl Default for EffortBands {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bands_cover_scale() {
        let bands = EffortBands::canonical();
        assert_eq!(bands.rpe_for(4.2), Rpe::Ten);
        assert_eq!(bands.rpe_for(3.5), Rpe::Ten);
        assert_eq!(bands.rpe_for(3.49), Rpe::NineFive);
        assert_eq!(bands.rpe_for(2.0), Rpe::EightFive);
        assert_eq!(bands.rpe_for(1.0), Rpe::SevenFive);
        assert_eq!(bands.rpe_for(0.99), Rpe::Seven);
        assert_eq!(bands.rpe_for(0.0), Rpe::Seven);
    }

    #[test]
    fn test_custom_bands_take_priority_order() {
        let bands = EffortBands::new(vec![(2.0, Rpe::Ten), (1.0, Rpe::Eight)], Rpe::Seven);
        assert_eq!(bands.rpe_for(2.5), Rpe::Ten);
        assert_eq!(bands.rpe_for(1.5), Rpe::Eight);
        assert_eq!(bands.rpe_for(0.5), Rpe::Seven);
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.smoothing_window, SMOOTHING_WINDOW);
        assert_eq!(config.threshold_floor, THRESHOLD_FLOOR);
        assert_eq!(config.min_rep_duration_sec, MIN_REP_DURATION_SEC);
    }
}
