//! Target image loading and posterization.

use std::path::Path;

use image::{GenericImageView, GrayImage};

use crate::schema::{Grid, SearchConfig, Shade, ShadeGrid};

use super::ImagingError;

/// Load a target image as a grid of shade indices.
///
/// The image must be exactly `3^target_iteration` pixels square. It is
/// converted to grayscale and posterized into `num_shades` levels. When
/// `audit_dir` is given, the grayscale copy is saved there as `target.png`.
pub fn load_target(
    path: &Path,
    config: &SearchConfig,
    audit_dir: Option<&Path>,
) -> Result<ShadeGrid, ImagingError> {
    let img = image::open(path)?;
    let expected = config.grid_side();
    let (width, height) = img.dimensions();

    if width as usize != expected || height as usize != expected {
        return Err(ImagingError::InvalidDimensions {
            expected,
            width,
            height,
        });
    }

    let gray = img.to_luma8();
    if let Some(dir) = audit_dir {
        gray.save(dir.join("target.png"))?;
    }

    let grid = posterize(&gray, config.num_shades)?;
    log::info!("Target file {} parsed.", path.display());
    Ok(grid)
}

/// Map 8-bit luma to `num_shades` levels: `floor(luma * (n - 1) / 255)`.
///
/// The image must be square.
pub fn posterize(gray: &GrayImage, num_shades: usize) -> Result<ShadeGrid, ImagingError> {
    let levels = num_shades.saturating_sub(1) as u32;
    let cells = gray
        .pixels()
        .map(|p| (u32::from(p.0[0]) * levels / 255) as Shade)
        .collect();

    let (width, height) = gray.dimensions();
    Grid::from_cells(width as usize, cells).ok_or(ImagingError::InvalidDimensions {
        expected: width as usize,
        width,
        height,
    })
}
