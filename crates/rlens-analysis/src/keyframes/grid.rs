//! Collage grid composition and encoding.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{imageops, DynamicImage, ImageBuffer, RgbImage};

use crate::error::AnalysisResult;

/// Compose a rows x cols grid of fixed-size cells into one image.
///
/// `cells` is row-major; a `None` cell stays black. Cell images are resized
/// to exactly `cell_size` square, distorting aspect ratio if needed so the
/// grid lines up.
pub fn compose_grid(
    cells: &[Option<DynamicImage>],
    rows: usize,
    cols: usize,
    cell_size: u32,
) -> RgbImage {
    let width = cols as u32 * cell_size;
    let height = rows as u32 * cell_size;
    let mut canvas: RgbImage = ImageBuffer::new(width, height);

    for (i, cell) in cells.iter().enumerate().take(rows * cols) {
        let Some(image) = cell else { continue };
        let resized = image
            .resize_exact(cell_size, cell_size, FilterType::Triangle)
            .to_rgb8();
        let x = (i % cols) as u32 * cell_size;
        let y = (i / cols) as u32 * cell_size;
        imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
    }

    canvas
}

/// Encode an RGB image as JPEG at the given quality.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> AnalysisResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode_image(image)?;
    Ok(buffer)
}
