//! Analysis metrics collection.
//!
//! Provides standardized metrics for monitoring the analysis pipeline:
//! - Analysis and rep counters by outcome
//! - Landmark fallback and degraded-metric counters
//! - Pipeline latency histograms
//!
//! Metrics are emitted through the `metrics` facade; installing an exporter
//! is the embedding application's job.

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Completed set analyses by outcome.
    pub const ANALYSES_TOTAL: &str = "replens_analyses_total";

    /// Reps emitted by the boundary detector.
    pub const REPS_DETECTED_TOTAL: &str = "replens_reps_detected_total";

    /// Candidate reps dropped before emission, by reason.
    pub const REPS_DROPPED_TOTAL: &str = "replens_reps_dropped_total";

    /// Landmark elections that used the relaxed fallback.
    pub const LANDMARK_FALLBACKS_TOTAL: &str = "replens_landmark_fallbacks_total";

    /// Optional metrics degraded to null, by metric.
    pub const METRICS_DEGRADED_TOTAL: &str = "replens_metrics_degraded_total";

    /// Collage cells left blank after frame extraction failed.
    pub const COLLAGE_BLANK_CELLS_TOTAL: &str = "replens_collage_blank_cells_total";

    /// End-to-end analysis latency in seconds.
    pub const ANALYSIS_LATENCY_SECONDS: &str = "replens_analysis_latency_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record a completed analysis.
pub fn record_analysis(outcome: &str, rep_count: usize, latency_ms: f64) {
    counter!(
        names::ANALYSES_TOTAL,
        "outcome" => outcome.to_string()
    )
    .increment(1);

    if rep_count > 0 {
        counter!(names::REPS_DETECTED_TOTAL).increment(rep_count as u64);
    }

    histogram!(names::ANALYSIS_LATENCY_SECONDS).record(latency_ms / 1000.0);
}

/// Record candidate reps dropped before emission.
pub fn record_dropped_reps(reason: &str, count: usize) {
    if count > 0 {
        counter!(
            names::REPS_DROPPED_TOTAL,
            "reason" => reason.to_string()
        )
        .increment(count as u64);
    }
}

/// Record a landmark election that fell back to the relaxed filter.
pub fn record_landmark_fallback() {
    counter!(names::LANDMARK_FALLBACKS_TOTAL).increment(1);
}

/// Record an optional metric degraded to null.
pub fn record_degraded_metric(metric: &str) {
    counter!(
        names::METRICS_DEGRADED_TOTAL,
        "metric" => metric.to_string()
    )
    .increment(1);
}

/// Record collage cells left blank by failed extractions.
pub fn record_blank_cells(count: usize) {
    if count > 0 {
        counter!(names::COLLAGE_BLANK_CELLS_TOTAL).increment(count as u64);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::ANALYSES_TOTAL.contains("analyses"));
        assert!(names::REPS_DETECTED_TOTAL.contains("reps"));
        assert!(names::ANALYSIS_LATENCY_SECONDS.contains("latency"));
    }
}
