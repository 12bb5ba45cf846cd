//! Primary landmark election and trajectory assembly.
//!
//! Reps are detected on a single vertical series, but the pose extractor
//! tracks many landmarks. This module elects the landmark that actually
//! moved (total variation over its valid samples), cleans gaps out of its
//! series, and carries along the side data later stages need: the
//! concurrent x-series for path deviation and both wrist series for
//! asymmetry scoring.

use rlens_models::{Landmark, LandmarkSeries, LandmarkTrack};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};

/// Both wrist y-series, gap-filled, for asymmetry analysis.
#[derive(Debug, Clone)]
pub struct WristPair {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

/// The elected primary trajectory plus side data for later stages.
#[derive(Debug, Clone)]
pub struct MotionTrajectory {
    /// Landmark the set is tracked on.
    pub landmark: Landmark,

    /// Gap-filled vertical series of the primary landmark.
    pub y: Vec<f64>,

    /// Gap-filled horizontal series, when the extractor provided x data.
    pub x: Option<Vec<f64>>,

    /// Gap-filled left and right wrist series, when both were tracked.
    pub wrists: Option<WristPair>,

    /// True when election had to use the relaxed fallback filter.
    pub used_fallback: bool,
}

/// Elects the primary landmark and assembles its cleaned trajectory.
#[derive(Debug, Clone)]
pub struct TrajectoryBuilder {
    config: AnalysisConfig,
}

impl TrajectoryBuilder {
    /// Create a builder with default tuning.
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Create a builder with custom tuning.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Elect the primary landmark and build its trajectory.
    ///
    /// # Arguments
    /// * `series` - All landmark tracks extracted from the video
    ///
    /// # Returns
    /// The cleaned trajectory, or [`AnalysisError::NoUsableLandmark`] when
    /// no track clears even the relaxed filter.
    pub fn build(&self, series: &LandmarkSeries) -> AnalysisResult<MotionTrajectory> {
        if series.is_empty() {
            return Err(AnalysisError::invalid_input("landmark series is empty"));
        }

        let (landmark, track, used_fallback) = self.elect(series)?;

        let y = interpolate_gaps(&track.y).ok_or(AnalysisError::NoUsableLandmark)?;
        let x = track.x.as_deref().and_then(interpolate_gaps);
        let wrists = self.wrist_pair(series);

        Ok(MotionTrajectory {
            landmark,
            y,
            x,
            wrists,
            used_fallback,
        })
    }

    /// Pick the candidate with maximum total variation among visible tracks,
    /// falling back to the first track with a minimal sample count.
    fn elect<'a>(
        &self,
        series: &'a LandmarkSeries,
    ) -> AnalysisResult<(Landmark, &'a LandmarkTrack, bool)> {
        let mut best: Option<(Landmark, &LandmarkTrack, f64)> = None;

        for (landmark, track) in series.iter() {
            if !self.is_visible(track) {
                debug!(
                    landmark = %landmark,
                    valid_samples = track.valid_count(),
                    "Landmark failed visibility filter"
                );
                continue;
            }

            let motion = total_variation(&track.y);
            debug!(landmark = %landmark, motion, "Landmark passed visibility filter");

            // Strictly-greater comparison keeps the earliest landmark on ties
            if best.as_ref().map_or(true, |(_, _, current)| motion > *current) {
                best = Some((landmark, track, motion));
            }
        }

        if let Some((landmark, track, motion)) = best {
            info!(
                landmark = %landmark,
                total_variation = motion,
                "Selected primary landmark"
            );
            return Ok((landmark, track, false));
        }

        for (landmark, track) in series.iter() {
            if track.valid_count() >= self.config.relaxed_min_samples {
                warn!(
                    landmark = %landmark,
                    valid_samples = track.valid_count(),
                    "No landmark passed the visibility filter; using relaxed fallback"
                );
                crate::metrics::record_landmark_fallback();
                return Ok((landmark, track, true));
            }
        }

        Err(AnalysisError::NoUsableLandmark)
    }

    fn is_visible(&self, track: &LandmarkTrack) -> bool {
        track.valid_count() >= self.config.min_visible_samples
            && motion_span(&track.y) >= self.config.min_motion_span
    }

    fn wrist_pair(&self, series: &LandmarkSeries) -> Option<WristPair> {
        let left = series.track(Landmark::LeftWrist)?;
        let right = series.track(Landmark::RightWrist)?;
        if left.valid_count() < self.config.relaxed_min_samples
            || right.valid_count() < self.config.relaxed_min_samples
        {
            return None;
        }
        Some(WristPair {
            left: interpolate_gaps(&left.y)?,
            right: interpolate_gaps(&right.y)?,
        })
    }
}

impl Default for TrajectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// === Signal Helpers ===

/// Sum of |Δy| between consecutive valid samples, skipping gaps.
fn total_variation(samples: &[Option<f64>]) -> f64 {
    let mut total = 0.0;
    let mut prev: Option<f64> = None;
    for sample in samples {
        if let Some(value) = *sample {
            if let Some(previous) = prev {
                total += (value - previous).abs();
            }
            prev = Some(value);
        }
    }
    total
}

/// Vertical span covered by the valid samples.
fn motion_span(samples: &[Option<f64>]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in samples.iter().flatten() {
        min = min.min(*value);
        max = max.max(*value);
    }
    if max > min {
        max - min
    } else {
        0.0
    }
}

/// Fill gaps by linear interpolation between nearest valid neighbors.
///
/// Leading and trailing gaps hold the first/last valid value. Returns
/// `None` when the track has no valid samples at all.
fn interpolate_gaps(samples: &[Option<f64>]) -> Option<Vec<f64>> {
    let first_valid = samples.iter().position(|sample| sample.is_some())?;
    let mut result = Vec::with_capacity(samples.len());

    let mut prev_index = first_valid;
    let mut prev_value = samples[first_valid]?;

    result.extend(std::iter::repeat(prev_value).take(first_valid));
    result.push(prev_value);

    for index in (first_valid + 1)..samples.len() {
        if let Some(value) = samples[index] {
            let gap = index - prev_index;
            if gap > 1 {
                let step = (value - prev_value) / gap as f64;
                for offset in 1..gap {
                    result.push(prev_value + step * offset as f64);
                }
            }
            result.push(value);
            prev_index = index;
            prev_value = value;
        }
    }

    result.extend(std::iter::repeat(prev_value).take(samples.len() - prev_index - 1));

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlens_models::LandmarkTrack;

    fn oscillating_track(frames: usize, amplitude: f64) -> LandmarkTrack {
        let y = (0..frames)
            .map(|i| Some(0.5 + amplitude * ((i as f64) * 0.4).sin()))
            .collect();
        LandmarkTrack::from_y(y)
    }

    #[test]
    fn test_elects_landmark_with_most_motion() {
        let series = LandmarkSeries::new()
            .with_track(Landmark::Head, oscillating_track(40, 0.03))
            .with_track(Landmark::Hip, oscillating_track(40, 0.15));

        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        assert_eq!(trajectory.landmark, Landmark::Hip);
        assert!(!trajectory.used_fallback);
        assert_eq!(trajectory.y.len(), 40);
    }

    #[test]
    fn test_tie_breaks_by_priority_order() {
        let series = LandmarkSeries::new()
            .with_track(Landmark::Hip, oscillating_track(40, 0.1))
            .with_track(Landmark::RightWrist, oscillating_track(40, 0.1));

        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        assert_eq!(trajectory.landmark, Landmark::RightWrist);
    }

    #[test]
    fn test_visibility_filter_rejects_narrow_span() {
        // Busy but tiny motion: large total variation, span under the floor
        let jitter = LandmarkTrack::from_y(
            (0..60)
                .map(|i| Some(0.5 + 0.004 * if i % 2 == 0 { 1.0 } else { -1.0 }))
                .collect(),
        );
        let series = LandmarkSeries::new()
            .with_track(Landmark::LeftWrist, jitter)
            .with_track(Landmark::Hip, oscillating_track(40, 0.1));

        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        assert_eq!(trajectory.landmark, Landmark::Hip);
    }

    #[test]
    fn test_fallback_elects_first_sparse_track() {
        let sparse = LandmarkTrack::from_y(vec![Some(0.4), Some(0.5), None, None]);
        let series = LandmarkSeries::new()
            .with_track(Landmark::Hip, sparse.clone())
            .with_track(Landmark::Head, sparse);

        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        assert_eq!(trajectory.landmark, Landmark::Hip);
        assert!(trajectory.used_fallback);
    }

    #[test]
    fn test_no_usable_landmark() {
        let series = LandmarkSeries::new()
            .with_track(Landmark::Hip, LandmarkTrack::from_y(vec![Some(0.4), None]))
            .with_track(Landmark::Head, LandmarkTrack::from_y(vec![None, None]));

        let err = TrajectoryBuilder::new().build(&series).unwrap_err();
        assert!(matches!(err, AnalysisError::NoUsableLandmark));
    }

    #[test]
    fn test_empty_series_is_invalid_input() {
        let err = TrajectoryBuilder::new()
            .build(&LandmarkSeries::new())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_interpolation_fills_interior_gaps() {
        let filled = interpolate_gaps(&[Some(0.0), None, None, Some(3.0)]).unwrap();
        assert_eq!(filled, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_interpolation_holds_edges() {
        let filled = interpolate_gaps(&[None, Some(1.0), None, Some(2.0), None, None]).unwrap();
        assert_eq!(filled, vec![1.0, 1.0, 1.5, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_interpolation_requires_a_valid_sample() {
        assert!(interpolate_gaps(&[None, None]).is_none());
    }

    #[test]
    fn test_wrist_pair_requires_both_wrists() {
        let series = LandmarkSeries::new()
            .with_track(Landmark::LeftWrist, oscillating_track(40, 0.1))
            .with_track(Landmark::Hip, oscillating_track(40, 0.12));

        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        assert!(trajectory.wrists.is_none());

        let series = series.with_track(Landmark::RightWrist, oscillating_track(40, 0.1));
        let trajectory = TrajectoryBuilder::new().build(&series).unwrap();
        let wrists = trajectory.wrists.unwrap();
        assert_eq!(wrists.left.len(), 40);
        assert_eq!(wrists.right.len(), 40);
    }
}
