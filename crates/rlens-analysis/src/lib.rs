#![deny(unreachable_patterns)]
//! Rep segmentation and quality metrics for lifting videos.
//!
//! This crate turns per-frame pose landmarks into per-rep training data:
//! 1. Landmark election by total vertical travel, with visibility gating
//! 2. Moving-average smoothing of the winning trajectory
//! 3. Hysteresis rep boundary detection with an adaptive threshold
//! 4. Per-rep tempo, effort, smoothness, and balance metrics
//! 5. Bounded keyframe collage planning and FFmpeg-backed export
//!
//! # Architecture
//!
//! ```text
//! LandmarkSeries + fps
//!     │
//!     ▼
//! ┌────────────────────┐
//! │ Trajectory Builder │ ← Elect the most-traveled visible landmark
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐
//! │      Smoother      │ ← 5-frame moving average
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐
//! │  Boundary Detector │ ← Hysteresis state machine, short-rep filter
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐
//! │ Metrics Calculator │ ← Tempo, RPE/RIR, smoothness, ROM, stall,
//! └─────────┬──────────┘   path deviation, asymmetry
//!           │
//!           ▼
//!    Vec<RepMetrics> ──► Collage Exporter ──► keyframe JPEGs
//! ```
//!
//! Analysis is pure and deterministic; only the collage exporter touches
//! the filesystem and FFmpeg.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod error;
pub mod keyframes;
pub mod metrics;
pub mod rep_metrics;
pub mod smoothing;
pub mod trajectory;

// Pipeline exports
pub use analyzer::SetAnalyzer;
pub use config::{AnalysisConfig, EffortBands, ANALYSIS_VERSION};
pub use detector::RepBoundaryDetector;
pub use error::{AnalysisError, AnalysisResult};
pub use rep_metrics::{RepMetricsCalculator, RepWindows};
pub use trajectory::{MotionTrajectory, TrajectoryBuilder, WristPair};

// Keyframe export
pub use keyframes::frames::FrameExtractor;
pub use keyframes::sampling::plan_collages;
pub use keyframes::{check_ffmpeg, CollageConfig, CollageExporter};
