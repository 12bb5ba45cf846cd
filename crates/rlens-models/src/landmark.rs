//! Pose landmark identifiers and per-landmark motion tracks.
//!
//! A [`LandmarkSeries`] is the engine's input: for every landmark the pose
//! extractor tracked, one optional vertical sample per frame (and optionally
//! a horizontal sample). Coordinates are normalized to the frame, with y
//! growing downward as pose extractors report them.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A tracked pose landmark.
///
/// Declaration order is the deterministic priority used to break motion-score
/// ties and to scan for a relaxed-fallback track, so the order here is part
/// of the engine's contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    LeftWrist,
    RightWrist,
    LeftAnkle,
    RightAnkle,
    Hip,
    Head,
    LeftKnee,
    RightKnee,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
}

impl Landmark {
    /// All landmarks in priority order.
    pub const ALL: [Landmark; 12] = [
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::Hip,
        Landmark::Head,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
    ];

    /// Returns the landmark as a string for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::Hip => "hip",
            Self::Head => "head",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame samples for a single landmark.
///
/// `None` marks a frame where the extractor reported the landmark below its
/// visibility threshold, or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkTrack {
    /// Vertical position per frame, normalized to frame height.
    pub y: Vec<Option<f64>>,

    /// Horizontal position per frame, when the extractor provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Option<f64>>>,
}

impl LandmarkTrack {
    /// Create a track from vertical samples only.
    pub fn from_y(y: Vec<Option<f64>>) -> Self {
        Self { y, x: None }
    }

    /// Create a fully visible track from raw vertical values.
    pub fn from_values(y: Vec<f64>) -> Self {
        Self {
            y: y.into_iter().map(Some).collect(),
            x: None,
        }
    }

    /// Attach horizontal samples to the track.
    pub fn with_x(mut self, x: Vec<Option<f64>>) -> Self {
        self.x = Some(x);
        self
    }

    /// Number of frames covered by the track.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns true if the track covers no frames.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Number of frames with a visible vertical sample.
    pub fn valid_count(&self) -> usize {
        self.y.iter().filter(|sample| sample.is_some()).count()
    }
}

/// All landmark tracks extracted from one video.
///
/// Iteration order follows [`Landmark`] priority order regardless of
/// insertion order, which keeps every downstream decision deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkSeries {
    tracks: BTreeMap<Landmark, LandmarkTrack>,
}

impl LandmarkSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a landmark's track.
    pub fn insert(&mut self, landmark: Landmark, track: LandmarkTrack) {
        self.tracks.insert(landmark, track);
    }

    /// Builder-style insert.
    pub fn with_track(mut self, landmark: Landmark, track: LandmarkTrack) -> Self {
        self.insert(landmark, track);
        self
    }

    /// Look up a landmark's track.
    pub fn track(&self, landmark: Landmark) -> Option<&LandmarkTrack> {
        self.tracks.get(&landmark)
    }

    /// Iterate tracks in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &LandmarkTrack)> {
        self.tracks.iter().map(|(landmark, track)| (*landmark, track))
    }

    /// Number of landmarks with a track.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns true if no landmark has a track.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_serializes_snake_case() {
        let json = serde_json::to_string(&Landmark::LeftWrist).unwrap();
        assert_eq!(json, "\"left_wrist\"");

        let parsed: Landmark = serde_json::from_str("\"right_ankle\"").unwrap();
        assert_eq!(parsed, Landmark::RightAnkle);
    }

    #[test]
    fn test_landmark_all_matches_priority_order() {
        let mut sorted = Landmark::ALL;
        sorted.sort();
        assert_eq!(sorted, Landmark::ALL);
        assert_eq!(Landmark::ALL[0], Landmark::LeftWrist);
        assert_eq!(Landmark::ALL[4], Landmark::Hip);
    }

    #[test]
    fn test_track_valid_count_ignores_gaps() {
        let track = LandmarkTrack::from_y(vec![Some(0.5), None, Some(0.6), None]);
        assert_eq!(track.len(), 4);
        assert_eq!(track.valid_count(), 2);
    }

    #[test]
    fn test_series_iterates_in_priority_order() {
        let series = LandmarkSeries::new()
            .with_track(Landmark::Head, LandmarkTrack::from_values(vec![0.2]))
            .with_track(Landmark::LeftWrist, LandmarkTrack::from_values(vec![0.5]));

        let order: Vec<Landmark> = series.iter().map(|(landmark, _)| landmark).collect();
        assert_eq!(order, vec![Landmark::LeftWrist, Landmark::Head]);
    }

    #[test]
    fn test_series_round_trips_through_json() {
        let series = LandmarkSeries::new().with_track(
            Landmark::Hip,
            LandmarkTrack::from_y(vec![Some(0.4), None]).with_x(vec![Some(0.5), Some(0.5)]),
        );

        let json = serde_json::to_string(&series).unwrap();
        let parsed: LandmarkSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, series);
    }
}
