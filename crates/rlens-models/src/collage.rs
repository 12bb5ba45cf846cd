//! Keyframe sampling and collage planning models.
//!
//! A [`CollagePlan`] describes which reps and phases get sampled into which
//! collage image. Plans are bounded: no matter how long the set is, at most
//! two collages of at most four reps each are produced.

use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rep phase a keyframe is sampled at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Peak,
    Stop,
}

impl Phase {
    /// Column order within a collage row.
    pub const ALL: [Phase; 3] = [Phase::Start, Phase::Peak, Phase::Stop];

    /// Returns the phase as a string for display and file naming.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Peak => "peak",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which slice of the set a collage covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CollageLabel {
    /// Every rep of a short set.
    Full,
    /// The first four reps of a longer set.
    First4,
    /// The last four reps of a longer set.
    Last4,
}

impl CollageLabel {
    /// Returns the label as a string for display and file naming.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::First4 => "first4",
            Self::Last4 => "last4",
        }
    }

    /// File name of the written collage image.
    pub fn file_name(&self) -> String {
        format!("collage_{}.jpg", self.as_str())
    }
}

impl fmt::Display for CollageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned collage: which reps and phases go into the grid.
///
/// Rows are reps (in `rep_indices` order), columns are phases (in `phases`
/// order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollageGroup {
    /// Collage identity and file naming.
    pub label: CollageLabel,

    /// 1-based rep indices, in row order.
    pub rep_indices: Vec<u32>,

    /// Phases sampled per rep, in column order.
    pub phases: Vec<Phase>,
}

impl CollageGroup {
    /// Create a group sampling the standard start/peak/stop phases.
    pub fn new(label: CollageLabel, rep_indices: Vec<u32>) -> Self {
        Self {
            label,
            rep_indices,
            phases: Phase::ALL.to_vec(),
        }
    }

    /// Number of grid cells (rows x columns).
    pub fn cell_count(&self) -> usize {
        self.rep_indices.len() * self.phases.len()
    }
}

/// Bounded sampling plan for a whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollagePlan {
    /// Planned collages, at most two.
    pub groups: Vec<CollageGroup>,
}

impl CollagePlan {
    /// A plan producing no collages (empty set).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the plan produces no collages.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total frames the plan will extract across all collages.
    pub fn frame_budget(&self) -> usize {
        self.groups.iter().map(CollageGroup::cell_count).sum()
    }
}

/// A collage image written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollageArtifact {
    /// Where the JPEG was written.
    pub path: PathBuf,

    /// Which slice of the set it covers.
    pub label: CollageLabel,

    /// Reps included, in row order.
    pub rep_indices: Vec<u32>,

    /// Phases sampled per rep, in column order.
    pub phases: Vec<Phase>,
}
