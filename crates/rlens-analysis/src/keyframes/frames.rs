//! Single-frame extraction from the source video via FFmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use image::DynamicImage;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

/// Pulls individual frames out of one video by frame index.
///
/// Each extraction seeks to the frame's timestamp and dumps a single
/// high-quality JPEG into a scratch directory, then decodes it in memory.
/// Extraction failures are returned as errors so the caller can decide
/// whether a missing frame degrades or aborts the larger artifact.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    video: PathBuf,
    fps: f64,
}

impl FrameExtractor {
    /// Create an extractor for one video clocked at `fps`.
    pub fn new(video: impl Into<PathBuf>, fps: f64) -> Self {
        Self {
            video: video.into(),
            fps,
        }
    }

    /// Video timestamp of a frame index, in seconds.
    pub fn timestamp(&self, frame_index: usize) -> f64 {
        frame_index as f64 / self.fps
    }

    /// Extract the frame at `frame_index` as a decoded image.
    ///
    /// `work_dir` holds the transient JPEG; it is removed again after a
    /// successful decode.
    pub async fn extract(
        &self,
        frame_index: usize,
        work_dir: &Path,
    ) -> AnalysisResult<DynamicImage> {
        let time = self.timestamp(frame_index);
        let frame_path = work_dir.join(format!("frame_{:06}.jpg", frame_index));

        let extract_result = Command::new("ffmpeg")
            .args([
                "-ss",
                &format!("{:.3}", time),
                "-i",
                self.video.to_str().unwrap_or(""),
                "-vframes",
                "1",
                "-q:v",
                "2",
                "-y",
                frame_path.to_str().unwrap_or(""),
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        if let Err(e) = extract_result {
            return Err(AnalysisError::frame_extraction_failed(
                frame_index,
                e.to_string(),
            ));
        }
        if !frame_path.exists() {
            return Err(AnalysisError::frame_extraction_failed(
                frame_index,
                "ffmpeg produced no frame",
            ));
        }

        let frame_data = tokio::fs::read(&frame_path).await?;
        let img = image::load_from_memory(&frame_data)?;
        let _ = tokio::fs::remove_file(&frame_path).await;

        debug!(frame = frame_index, time, "Extracted keyframe");
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_from_frame_index() {
        let extractor = FrameExtractor::new("/tmp/set.mp4", 30.0);
        assert!((extractor.timestamp(0) - 0.0).abs() < 1e-9);
        assert!((extractor.timestamp(45) - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_extract_from_missing_video_fails() {
        let work_dir = tempfile::tempdir().unwrap();
        let extractor = FrameExtractor::new("/nonexistent/set.mp4", 30.0);
        let result = extractor.extract(0, work_dir.path()).await;
        assert!(result.is_err());
    }
}
