//! Error types for analysis operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur during set analysis.
///
/// Per-rep metric degradation is not an error; degraded optional metrics
/// surface as `None` fields on the rep record instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("No landmark track is usable for rep detection")]
    NoUsableLandmark,

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("Frame extraction failed at frame {frame}: {message}")]
    FrameExtractionFailed { frame: usize, message: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AnalysisError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Create a frame extraction failure error.
    pub fn frame_extraction_failed(frame: usize, message: impl Into<String>) -> Self {
        Self::FrameExtractionFailed {
            frame,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::insufficient_data(5, 3);
        assert_eq!(
            err.to_string(),
            "Insufficient data: need at least 5 samples, got 3"
        );

        let err = AnalysisError::NoUsableLandmark;
        assert!(err.to_string().contains("landmark"));
    }
}
