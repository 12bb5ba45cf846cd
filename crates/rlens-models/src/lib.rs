//! Shared data models for the RepLens analysis engine.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmark tracks (the analysis input)
//! - Rep boundaries and per-rep metric records
//! - Effort estimation (RPE and reps-in-reserve)
//! - Keyframe collage plans and written artifacts

pub mod collage;
pub mod effort;
pub mod landmark;
pub mod rep;

// Re-export common types
pub use collage::{CollageArtifact, CollageGroup, CollageLabel, CollagePlan, Phase};
pub use effort::{Rpe, RpeError};
pub use landmark::{Landmark, LandmarkSeries, LandmarkTrack};
pub use rep::{RepBoundary, RepMetrics, Tempo};
