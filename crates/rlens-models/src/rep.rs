//! Per-rep boundary and metric records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collage::Phase;
use crate::effort::Rpe;

/// Frame-index boundaries of a single detected rep.
///
/// Indices address the smoothed trajectory the detector scanned. `index` is
/// the 1-based position of the rep within the set after short-rep filtering,
/// so emitted reps are always numbered 1..=n with no holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepBoundary {
    /// 1-based rep number within the set.
    pub index: u32,

    /// Frame where upward motion began.
    pub start_frame: usize,

    /// Frame of maximum displacement within the rep.
    pub peak_frame: usize,

    /// Frame where motion turned back down, ending the rep.
    pub stop_frame: usize,
}

impl RepBoundary {
    /// Frame sampled for a collage phase.
    pub fn frame_for(&self, phase: Phase) -> usize {
        match phase {
            Phase::Start => self.start_frame,
            Phase::Peak => self.peak_frame,
            Phase::Stop => self.stop_frame,
        }
    }

    /// Frames spanned from start to stop.
    pub fn frame_span(&self) -> usize {
        self.stop_frame.saturating_sub(self.start_frame)
    }
}

/// Phase durations of one rep, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tempo {
    /// Lowering phase (downward displacement leg).
    pub eccentric_sec: f64,

    /// Hold between the moving leg and the rep end.
    pub pause_sec: f64,

    /// Lifting phase (upward displacement leg).
    pub concentric_sec: f64,
}

impl Tempo {
    /// Total seconds across all three phases.
    pub fn total(&self) -> f64 {
        self.eccentric_sec + self.pause_sec + self.concentric_sec
    }
}

/// Full per-rep quality record emitted by the analysis pipeline.
///
/// Optional metrics are `None` when their inputs were unavailable or
/// degenerate for this rep. They serialize as JSON `null` so consumers can
/// tell "not computed" apart from a legitimate zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RepMetrics {
    /// Rep boundaries, flattened into the record.
    #[serde(flatten)]
    pub boundary: RepBoundary,

    /// Rep start time within the video, in seconds.
    pub time_sec: f64,

    /// Wall duration of the rep in seconds.
    pub duration_sec: f64,

    /// Eccentric / pause / concentric split.
    pub tempo: Tempo,

    /// Seconds under load across the rep.
    pub total_time_under_tension: f64,

    /// Estimated RPE from rep duration.
    #[serde(rename = "estimated_RPE")]
    pub estimated_rpe: Rpe,

    /// Reps-in-reserve phrase paired with the RPE.
    #[serde(rename = "estimated_RIR")]
    pub estimated_rir: String,

    /// Movement smoothness on a 0-100 scale (100 = perfectly even speed).
    pub smoothness_score: f64,

    /// Vertical range of motion in scaled distance units.
    pub range_of_motion: f64,

    /// True when speed collapsed mid-rep (sticking point).
    pub velocity_stall: bool,

    /// Lateral drift of the movement path in scaled units, when horizontal
    /// data exists for the rep.
    pub path_deviation: Option<f64>,

    /// Left/right wrist imbalance score, when both wrists were tracked.
    pub asymmetry_score: Option<f64>,
}
