//! Set analysis orchestration.
//!
//! [`SetAnalyzer`] wires the pipeline stages together: landmark election,
//! signal conditioning, boundary detection, and per-rep scoring. It owns one
//! instance of each stage so a configured analyzer can be reused across
//! videos.

use std::time::Instant;

use rlens_models::{LandmarkSeries, RepMetrics};
use tracing::{debug, info, warn};

use crate::config::{AnalysisConfig, ANALYSIS_VERSION};
use crate::detector::RepBoundaryDetector;
use crate::error::{AnalysisError, AnalysisResult};
use crate::rep_metrics::{RepMetricsCalculator, RepWindows};
use crate::smoothing::moving_average_valid;
use crate::trajectory::TrajectoryBuilder;

/// The full rep analysis pipeline.
pub struct SetAnalyzer {
    config: AnalysisConfig,
    trajectory: TrajectoryBuilder,
    detector: RepBoundaryDetector,
    calculator: RepMetricsCalculator,
}

impl SetAnalyzer {
    /// Create an analyzer with default tuning.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create an analyzer with custom tuning.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            trajectory: TrajectoryBuilder::with_config(config.clone()),
            detector: RepBoundaryDetector::with_config(config.clone()),
            calculator: RepMetricsCalculator::with_config(config.clone()),
            config,
        }
    }

    /// Analyze one set.
    ///
    /// # Arguments
    /// * `series` - Landmark tracks extracted from the video
    /// * `fps` - Frames per second of the source video
    ///
    /// # Returns
    /// Per-rep metric records ordered by rep index. An empty list is a valid
    /// outcome for a video with no detectable reps.
    pub fn analyze(&self, series: &LandmarkSeries, fps: f64) -> AnalysisResult<Vec<RepMetrics>> {
        let started = Instant::now();
        let result = self.run(series, fps);
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(reps) => {
                crate::metrics::record_analysis("ok", reps.len(), latency_ms);
                info!(
                    reps = reps.len(),
                    latency_ms = latency_ms as u64,
                    "Set analysis complete"
                );
            }
            Err(error) => {
                crate::metrics::record_analysis("failed", 0, latency_ms);
                warn!(error = %error, "Set analysis failed");
            }
        }

        result
    }

    fn run(&self, series: &LandmarkSeries, fps: f64) -> AnalysisResult<Vec<RepMetrics>> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "fps must be positive, got {fps}"
            )));
        }

        debug!(
            version = ANALYSIS_VERSION,
            fps,
            landmarks = series.len(),
            "Starting set analysis"
        );

        // Stage 1: elect the primary landmark trajectory
        let trajectory = self.trajectory.build(series)?;

        // Stage 2: condition the signal
        let smoothed = moving_average_valid(&trajectory.y, self.config.smoothing_window)?;

        // Stage 3: segment into reps
        let boundaries = self.detector.detect(&smoothed, fps);

        // Stage 4: score each rep
        let wrists = trajectory.wrists.as_ref();
        let mut reps = Vec::with_capacity(boundaries.len());
        for boundary in boundaries {
            let range = boundary.start_frame..=boundary.stop_frame;
            let windows = RepWindows {
                segment: smoothed.get(range.clone()).unwrap_or(&[]),
                x: trajectory
                    .x
                    .as_deref()
                    .and_then(|x| x.get(range.clone())),
                left_wrist: wrists.and_then(|w| w.left.get(range.clone())),
                right_wrist: wrists.and_then(|w| w.right.get(range.clone())),
            };
            reps.push(self.calculator.compute(boundary, &windows, fps));
        }

        Ok(reps)
    }
}

impl Default for SetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
