//! Per-rep metric computation.
//!
//! Scores one rep at a time from its smoothed segment and the aligned
//! optional side signals. Required metrics always compute for a boundary the
//! detector emitted; the optional metrics (path deviation, asymmetry)
//! degrade to `None` when their inputs are missing or degenerate, and never
//! fail the surrounding rep.
//!
//! All emitted floats are rounded to 2 decimals so repeated runs over the
//! same input serialize byte-identically.

use rlens_models::{RepBoundary, RepMetrics, Tempo};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::smoothing::{argmin, diff, mean, span, variance};

/// Signal windows for one rep, all aligned to `[start_frame..=stop_frame]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepWindows<'a> {
    /// Smoothed vertical segment the boundary was detected on.
    pub segment: &'a [f64],

    /// Horizontal window, when x data exists for the rep.
    pub x: Option<&'a [f64]>,

    /// Left wrist window, when tracked.
    pub left_wrist: Option<&'a [f64]>,

    /// Right wrist window, when tracked.
    pub right_wrist: Option<&'a [f64]>,
}

/// Computes the per-rep metric record.
#[derive(Debug, Clone)]
pub struct RepMetricsCalculator {
    config: AnalysisConfig,
}

impl RepMetricsCalculator {
    /// Create a calculator with default tuning.
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Create a calculator with custom tuning.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Score one rep.
    ///
    /// # Arguments
    /// * `boundary` - Boundary emitted by the detector over the same signal
    /// * `windows` - Signal windows aligned to the boundary
    /// * `fps` - Frames per second of the source video, must be positive
    pub fn compute(&self, boundary: RepBoundary, windows: &RepWindows<'_>, fps: f64) -> RepMetrics {
        let segment = windows.segment;

        let leg_sec = boundary.peak_frame.saturating_sub(boundary.start_frame) as f64 / fps;
        let pause_sec = boundary.stop_frame.saturating_sub(boundary.peak_frame) as f64 / fps;
        let duration_sec = boundary.frame_span() as f64 / fps;

        let tempo = self.tempo_for(&boundary, segment, leg_sec, pause_sec);
        let rpe = self.config.effort_bands.rpe_for(duration_sec);

        let velocity = diff(segment);
        let speeds: Vec<f64> = velocity.iter().map(|v| v.abs()).collect();

        RepMetrics {
            boundary,
            time_sec: round2(boundary.start_frame as f64 / fps),
            duration_sec: round2(duration_sec),
            tempo,
            total_time_under_tension: round2(leg_sec + pause_sec),
            estimated_rpe: rpe,
            estimated_rir: rpe.reps_in_reserve().to_string(),
            smoothness_score: self.smoothness_score(&velocity),
            range_of_motion: round2(span(segment) * self.config.distance_scale),
            velocity_stall: self.detect_stall(&speeds),
            path_deviation: self.path_deviation(boundary.index, windows.x),
            asymmetry_score: self.asymmetry_score(
                boundary.index,
                windows.left_wrist,
                windows.right_wrist,
            ),
        }
    }

    /// Allocate the moving leg by displacement direction: a peak above the
    /// start value reads as concentric-first, otherwise eccentric-first. The
    /// hold between peak and stop counts as pause either way.
    fn tempo_for(
        &self,
        boundary: &RepBoundary,
        segment: &[f64],
        leg_sec: f64,
        pause_sec: f64,
    ) -> Tempo {
        let peak_offset = boundary
            .peak_frame
            .saturating_sub(boundary.start_frame)
            .min(segment.len().saturating_sub(1));
        let start_value = segment.first().copied().unwrap_or(0.0);
        let peak_value = segment.get(peak_offset).copied().unwrap_or(start_value);

        if peak_value > start_value {
            Tempo {
                eccentric_sec: 0.0,
                pause_sec: round2(pause_sec),
                concentric_sec: round2(leg_sec),
            }
        } else {
            Tempo {
                eccentric_sec: round2(leg_sec),
                pause_sec: round2(pause_sec),
                concentric_sec: 0.0,
            }
        }
    }

    /// Smoothness from the variance of frame-to-frame velocity: 100 means
    /// perfectly even speed, 0 means the variance swamped the scale.
    fn smoothness_score(&self, velocity: &[f64]) -> f64 {
        let raw = 100.0 - variance(velocity) * self.config.smoothness_variance_scale;
        round2(raw.clamp(0.0, 100.0))
    }

    /// Sticking point: the slowest 3-frame window against the speed
    /// immediately after it. No post-window samples means no stall call.
    fn detect_stall(&self, speeds: &[f64]) -> bool {
        let Some(min_index) = argmin(speeds) else {
            return false;
        };

        let window_start = min_index.saturating_sub(1);
        let window_end = (min_index + 1).min(speeds.len() - 1);
        let mid = speeds[window_start..=window_end]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let peak = speeds
            .iter()
            .skip(window_end + 1)
            .take(2)
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        if !peak.is_finite() || peak <= 0.0 {
            return false;
        }
        mid / peak < self.config.stall_ratio
    }

    /// Lateral drift across the rep, when the x window exists.
    fn path_deviation(&self, rep_index: u32, x: Option<&[f64]>) -> Option<f64> {
        let Some(xs) = x else {
            debug!(rep = rep_index, "No x data for rep; path deviation unavailable");
            crate::metrics::record_degraded_metric("path_deviation");
            return None;
        };

        let drift: f64 = xs.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
        let value = round2(drift * self.config.distance_scale);
        if !value.is_finite() {
            warn!(rep = rep_index, "Path deviation was non-finite; degrading to null");
            crate::metrics::record_degraded_metric("path_deviation");
            return None;
        }
        Some(value)
    }

    /// Left/right imbalance, when both wrist windows exist and align.
    fn asymmetry_score(
        &self,
        rep_index: u32,
        left: Option<&[f64]>,
        right: Option<&[f64]>,
    ) -> Option<f64> {
        let (Some(left), Some(right)) = (left, right) else {
            debug!(rep = rep_index, "Wrist data incomplete; asymmetry unavailable");
            crate::metrics::record_degraded_metric("asymmetry_score");
            return None;
        };
        if left.len() != right.len() || left.is_empty() {
            debug!(rep = rep_index, "Wrist windows misaligned; asymmetry unavailable");
            crate::metrics::record_degraded_metric("asymmetry_score");
            return None;
        }

        let rom_penalty = (span(left) - span(right)).abs() * self.config.asymmetry_rom_weight;
        let offsets: Vec<f64> = left
            .iter()
            .zip(right)
            .map(|(l, r)| (l - r).abs())
            .collect();
        let gap_penalty = mean(&offsets) * self.config.asymmetry_gap_weight;

        let value = round2((100.0 - (rom_penalty + gap_penalty)).clamp(0.0, 100.0));
        if !value.is_finite() {
            warn!(rep = rep_index, "Asymmetry was non-finite; degrading to null");
            crate::metrics::record_degraded_metric("asymmetry_score");
            return None;
        }
        Some(value)
    }
}

impl Default for RepMetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to 2 decimal places for report output.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
