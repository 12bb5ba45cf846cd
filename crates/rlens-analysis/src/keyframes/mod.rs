//! Keyframe sampling and collage export.
//!
//! ```text
//! reps -> plan_collages -> extract frames -> compose grid -> JPEG on disk
//! ```
//!
//! The sampling plan is bounded (at most two collages of four reps), so
//! export cost does not grow with set length. Collages render concurrently;
//! a frame that fails to extract leaves its cell black instead of aborting
//! the collage.

pub mod frames;
pub mod grid;
pub mod sampling;

use std::path::{Path, PathBuf};

use futures::future::join_all;
use image::DynamicImage;
use rlens_models::{CollageArtifact, CollageGroup, Phase, RepMetrics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{COLLAGE_CELL_SIZE, COLLAGE_JPEG_QUALITY};
use crate::error::{AnalysisError, AnalysisResult};
use frames::FrameExtractor;

/// Verify that FFmpeg is available on the system.
pub fn check_ffmpeg() -> AnalysisResult<()> {
    which::which("ffmpeg").map_err(|_| AnalysisError::FfmpegNotFound)?;
    Ok(())
}

/// Configuration for collage rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageConfig {
    /// Square cell edge in pixels.
    pub cell_size: u32,

    /// JPEG quality for written images (1-100).
    pub jpeg_quality: u8,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            cell_size: COLLAGE_CELL_SIZE,
            jpeg_quality: COLLAGE_JPEG_QUALITY,
        }
    }
}

/// Renders keyframe collages for an analyzed set.
///
/// Each collage is a grid of rep rows by phase columns, sampled straight
/// from the source video at the detected boundary frames.
#[derive(Debug, Clone)]
pub struct CollageExporter {
    config: CollageConfig,
}

impl CollageExporter {
    /// Create an exporter with production settings.
    pub fn new() -> Self {
        Self::with_config(CollageConfig::default())
    }

    /// Create an exporter with custom settings.
    pub fn with_config(config: CollageConfig) -> Self {
        Self { config }
    }

    /// Export the planned collages for a set.
    ///
    /// # Arguments
    /// * `video` - Source video the reps were detected in
    /// * `reps` - Analyzed reps, numbered 1..=n
    /// * `fps` - Frame rate of the source video
    /// * `output_dir` - Directory collages are written into (created if absent)
    ///
    /// # Returns
    /// One artifact per written collage. An empty rep list yields no
    /// artifacts and touches neither FFmpeg nor the filesystem.
    pub async fn export(
        &self,
        video: &Path,
        reps: &[RepMetrics],
        fps: f64,
        output_dir: &Path,
    ) -> AnalysisResult<Vec<CollageArtifact>> {
        let plan = sampling::plan_collages(reps.len());
        if plan.is_empty() {
            return Ok(Vec::new());
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        check_ffmpeg()?;
        if !video.exists() {
            return Err(AnalysisError::FileNotFound(video.to_path_buf()));
        }
        tokio::fs::create_dir_all(output_dir).await?;
        let scratch = tempfile::tempdir()?;
        let extractor = FrameExtractor::new(video, fps);

        let tasks: Vec<_> = plan
            .groups
            .iter()
            .map(|group| self.export_group(&extractor, group, reps, scratch.path(), output_dir))
            .collect();
        let results = join_all(tasks).await;

        let mut artifacts = Vec::with_capacity(results.len());
        let mut blank_cells = 0;
        for result in results {
            let (artifact, blanks) = result?;
            blank_cells += blanks;
            artifacts.push(artifact);
        }
        crate::metrics::record_blank_cells(blank_cells);

        info!(
            collages = artifacts.len(),
            blank_cells,
            output_dir = %output_dir.display(),
            "Collage export complete"
        );
        Ok(artifacts)
    }

    /// Render one collage and write it into `output_dir`.
    ///
    /// Frames are pulled into a per-collage scratch subdirectory so
    /// concurrent collages never write the same transient path.
    async fn export_group(
        &self,
        extractor: &FrameExtractor,
        group: &CollageGroup,
        reps: &[RepMetrics],
        scratch: &Path,
        output_dir: &Path,
    ) -> AnalysisResult<(CollageArtifact, usize)> {
        let work_dir = scratch.join(group.label.as_str());
        tokio::fs::create_dir_all(&work_dir).await?;

        let rows = group.rep_indices.len();
        let cols = group.phases.len();
        let mut cells: Vec<Option<DynamicImage>> = Vec::with_capacity(rows * cols);
        let mut blank_cells = 0;

        for &rep_index in &group.rep_indices {
            let rep = (rep_index as usize)
                .checked_sub(1)
                .and_then(|i| reps.get(i));
            let Some(rep) = rep else {
                warn!(rep = rep_index, "Rep missing from metrics, leaving row blank");
                blank_cells += cols;
                cells.extend((0..cols).map(|_| None));
                continue;
            };

            for &phase in &group.phases {
                let frame = rep.boundary.frame_for(phase);
                match extractor.extract(frame, &work_dir).await {
                    Ok(image) => cells.push(Some(image)),
                    Err(e) => {
                        warn!(
                            rep = rep_index,
                            phase = %phase,
                            frame,
                            error = %e,
                            "Keyframe extraction failed, leaving cell blank"
                        );
                        blank_cells += 1;
                        cells.push(None);
                    }
                }
            }
        }

        let canvas = grid::compose_grid(&cells, rows, cols, self.config.cell_size);
        let bytes = grid::encode_jpeg(&canvas, self.config.jpeg_quality)?;
        let path = output_dir.join(group.label.file_name());
        tokio::fs::write(&path, bytes).await?;

        debug!(
            label = %group.label,
            rows,
            blank_cells,
            path = %path.display(),
            "Wrote collage"
        );
        Ok((
            CollageArtifact {
                path,
                label: group.label,
                rep_indices: group.rep_indices.clone(),
                phases: group.phases.clone(),
            },
            blank_cells,
        ))
    }

    /// Write each rep's start/peak/stop frame as its own JPEG.
    ///
    /// Files are named `rep{NN}_{phase}.jpg`. Frames that fail to extract
    /// are skipped rather than written blank; the returned paths are the
    /// files that actually landed on disk.
    pub async fn export_rep_frames(
        &self,
        video: &Path,
        reps: &[RepMetrics],
        fps: f64,
        output_dir: &Path,
    ) -> AnalysisResult<Vec<PathBuf>> {
        if reps.is_empty() {
            return Ok(Vec::new());
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        check_ffmpeg()?;
        if !video.exists() {
            return Err(AnalysisError::FileNotFound(video.to_path_buf()));
        }
        tokio::fs::create_dir_all(output_dir).await?;
        let scratch = tempfile::tempdir()?;
        let extractor = FrameExtractor::new(video, fps);

        let mut written = Vec::new();
        for rep in reps {
            for phase in Phase::ALL {
                let frame = rep.boundary.frame_for(phase);
                let image = match extractor.extract(frame, scratch.path()).await {
                    Ok(image) => image,
                    Err(e) => {
                        warn!(
                            rep = rep.boundary.index,
                            phase = %phase,
                            frame,
                            error = %e,
                            "Skipping rep frame"
                        );
                        continue;
                    }
                };

                let bytes = grid::encode_jpeg(&image.to_rgb8(), self.config.jpeg_quality)?;
                let path = output_dir.join(format!("rep{:02}_{}.jpg", rep.boundary.index, phase));
                tokio::fs::write(&path, bytes).await?;
                written.push(path);
            }
        }

        info!(
            frames = written.len(),
            output_dir = %output_dir.display(),
            "Rep frame export complete"
        );
        Ok(written)
    }
}

impl Default for CollageExporter {
    fn default() -> Self {
        Self::new()
    }
}
