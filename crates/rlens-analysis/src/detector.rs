//! Rep boundary detection over the smoothed trajectory.
//!
//! A two-state hysteresis machine walks the smoothed vertical series.
//! Consecutive samples that rise by more than an adaptive threshold open a
//! candidate rep; a matching fall closes it. The threshold adapts to the
//! signal's global range so that wide, slow movements and tight, short ones
//! segment with the same code path.
//!
//! Detection is fully deterministic: identical inputs produce an identical
//! ordered rep list.

use rlens_models::RepBoundary;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::smoothing::{argmax, span};

/// State machine phase between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MotionState {
    Down,
    Up,
}

/// Detects rep boundaries in a smoothed vertical trajectory.
#[derive(Debug, Clone)]
pub struct RepBoundaryDetector {
    config: AnalysisConfig,
}

impl RepBoundaryDetector {
    /// Create a detector with default tuning.
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Create a detector with custom tuning.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Hysteresis threshold for the given signal.
    ///
    /// The floor keeps micro-jitter from driving transitions; signals with a
    /// wider global range get a proportionally wider band on top of it.
    pub fn adaptive_threshold(&self, smoothed: &[f64]) -> f64 {
        self.config
            .threshold_floor
            .max(self.config.threshold_range_fraction * span(smoothed))
    }

    /// Scan the smoothed series and emit filtered, renumbered boundaries.
    ///
    /// Candidates shorter than the minimum rep duration and candidates still
    /// open at series end are silently dropped; emitted reps are renumbered
    /// 1..=n in order.
    ///
    /// # Arguments
    /// * `smoothed` - Smoothed vertical series (y grows downward)
    /// * `fps` - Frames per second of the source video, must be positive
    pub fn detect(&self, smoothed: &[f64], fps: f64) -> Vec<RepBoundary> {
        let threshold = self.adaptive_threshold(smoothed);
        let mut reps: Vec<RepBoundary> = Vec::new();
        let mut state = MotionState::Down;
        let mut start_frame = 0usize;
        let mut dropped_short = 0usize;

        for i in 1..smoothed.len() {
            match state {
                MotionState::Down => {
                    if smoothed[i] > smoothed[i - 1] + threshold {
                        state = MotionState::Up;
                        start_frame = i;
                    }
                }
                MotionState::Up => {
                    if smoothed[i] < smoothed[i - 1] - threshold {
                        state = MotionState::Down;
                        let stop_frame = i;
                        let peak_frame = argmax(&smoothed[start_frame..=i])
                            .map(|offset| start_frame + offset)
                            .unwrap_or(start_frame);
                        let duration_sec = (stop_frame - start_frame) as f64 / fps;

                        if duration_sec >= self.config.min_rep_duration_sec {
                            reps.push(RepBoundary {
                                index: 0, // renumbered below
                                start_frame,
                                peak_frame,
                                stop_frame,
                            });
                        } else {
                            dropped_short += 1;
                            debug!(
                                start_frame,
                                stop_frame, duration_sec, "Dropped short rep candidate"
                            );
                        }
                    }
                }
            }
        }

        for (i, rep) in reps.iter_mut().enumerate() {
            rep.index = (i + 1) as u32;
        }

        let dangling = state == MotionState::Up;
        if dangling {
            debug!(start_frame, "Dropped dangling rep candidate at series end");
        }
        crate::metrics::record_dropped_reps("too_short", dropped_short);
        crate::metrics::record_dropped_reps("dangling", usize::from(dangling));

        info!(
            reps = reps.len(),
            dropped_short, threshold, "Rep detection complete"
        );

        reps
    }
}

impl Default for RepBoundaryDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear ramps between (frame, value) anchors, inclusive of the last.
    fn piecewise(anchors: &[(usize, f64)]) -> Vec<f64> {
        let mut signal = Vec::new();
        for pair in anchors.windows(2) {
            let (i0, v0) = pair[0];
            let (i1, v1) = pair[1];
            let span = i1 - i0;
            for step in 0..span {
                signal.push(v0 + (v1 - v0) * step as f64 / span as f64);
            }
        }
        if let Some(&(_, last)) = anchors.last() {
            signal.push(last);
        }
        signal
    }

    #[test]
    fn test_two_cycles_yield_two_reps() {
        // Two slow-rise / fast-fall cycles across 40 frames at 20 fps
        let signal = piecewise(&[(0, 0.0), (18, 0.18), (20, 0.0), (38, 0.18), (40, 0.0)]);
        let reps = RepBoundaryDetector::new().detect(&signal, 20.0);

        assert_eq!(reps.len(), 2);

        assert_eq!(reps[0].index, 1);
        assert_eq!(reps[0].start_frame, 1);
        assert_eq!(reps[0].peak_frame, 18);
        assert_eq!(reps[0].stop_frame, 19);

        assert_eq!(reps[1].index, 2);
        assert_eq!(reps[1].start_frame, 21);
        assert_eq!(reps[1].peak_frame, 38);
        assert_eq!(reps[1].stop_frame, 39);

        for rep in &reps {
            let duration = (rep.stop_frame - rep.start_frame) as f64 / 20.0;
            assert!(duration >= 0.5);
            assert!(rep.start_frame <= rep.peak_frame && rep.peak_frame <= rep.stop_frame);
        }
    }

    #[test]
    fn test_flat_signal_yields_no_reps() {
        let reps = RepBoundaryDetector::new().detect(&vec![0.5; 100], 30.0);
        assert!(reps.is_empty());
    }

    #[test]
    fn test_empty_signal_yields_no_reps() {
        let reps = RepBoundaryDetector::new().detect(&[], 30.0);
        assert!(reps.is_empty());
    }

    #[test]
    fn test_short_blip_is_dropped() {
        // One candidate spanning ~0.27s at 30 fps, under the 0.5s minimum
        let signal = piecewise(&[(0, 0.0), (9, 0.18), (12, 0.0), (20, 0.0)]);
        let reps = RepBoundaryDetector::new().detect(&signal, 30.0);
        assert!(reps.is_empty());
    }

    #[test]
    fn test_dangling_candidate_is_dropped() {
        // Monotonic rise never closes
        let signal: Vec<f64> = (0..60).map(|i| i as f64 * 0.01).collect();
        let reps = RepBoundaryDetector::new().detect(&signal, 30.0);
        assert!(reps.is_empty());
    }

    #[test]
    fn test_renumbering_skips_dropped_candidates() {
        // Long rep, short blip, long rep at 10 fps
        let signal = piecewise(&[
            (0, 0.0),
            (10, 0.2),
            (12, 0.0),
            (15, 0.06),
            (17, 0.0),
            (27, 0.2),
            (29, 0.0),
        ]);
        let reps = RepBoundaryDetector::new().detect(&signal, 10.0);

        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0].index, 1);
        assert_eq!(reps[1].index, 2);
        assert_eq!(reps[0].start_frame, 1);
        assert_eq!(reps[1].start_frame, 18);
    }

    #[test]
    fn test_threshold_floor_and_range_fraction() {
        let detector = RepBoundaryDetector::new();

        // Tiny range: the floor wins
        let threshold = detector.adaptive_threshold(&[0.50, 0.51]);
        assert!((threshold - 0.003).abs() < 1e-12);

        // Wide range: 1% of the range wins
        let threshold = detector.adaptive_threshold(&[0.0, 10.0]);
        assert!((threshold - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let signal = piecewise(&[(0, 0.0), (18, 0.18), (20, 0.0), (38, 0.18), (40, 0.0)]);
        let detector = RepBoundaryDetector::new();
        assert_eq!(detector.detect(&signal, 20.0), detector.detect(&signal, 20.0));
    }
}
