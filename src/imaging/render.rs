//! Phenotype rendering.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::compute::expand;
use crate::schema::{Ruleset, SearchConfig, ShadeGrid};

use super::ImagingError;

/// Render a shade grid as an 8-bit image.
///
/// Shade `s` becomes intensity `s * 255 / (num_shades - 1)`. With a tint the
/// gray value is multiplied into each channel of the tint color.
pub fn render_phenotype(grid: &ShadeGrid, num_shades: usize, tint: Option<[u8; 3]>) -> DynamicImage {
    let side = grid.side() as u32;
    let levels = num_shades.saturating_sub(1).max(1) as u32;
    let intensity = |x: u32, y: u32| -> u8 {
        let shade = u32::from(grid.get(x as usize, y as usize));
        (shade * 255 / levels).min(255) as u8
    };

    match tint {
        None => DynamicImage::ImageLuma8(GrayImage::from_fn(side, side, |x, y| {
            Luma([intensity(x, y)])
        })),
        Some(color) => DynamicImage::ImageRgb8(RgbImage::from_fn(side, side, |x, y| {
            let v = u16::from(intensity(x, y));
            Rgb(color.map(|c| (v * u16::from(c) / 255) as u8))
        })),
    }
}

/// Expand a ruleset to `depth` levels and save the rendering to `path`.
pub fn save_phenotype(
    path: &Path,
    ruleset: &Ruleset,
    config: &SearchConfig,
    depth: u32,
) -> Result<(), ImagingError> {
    let grid = expand(ruleset, config.start_shade, depth);
    render_phenotype(&grid, config.num_shades, config.tint_color).save(path)?;
    Ok(())
}

/// Save the progress snapshot `progress-<generation>.png` into `dir`.
///
/// Snapshots are rendered at the target's resolution.
pub fn save_progress(
    dir: &Path,
    ruleset: &Ruleset,
    config: &SearchConfig,
    generation: usize,
) -> Result<PathBuf, ImagingError> {
    let path = dir.join(format!("progress-{generation}.png"));
    save_phenotype(&path, ruleset, config, config.target_iteration)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Grid;
    use tempfile::tempdir;

    fn carpet() -> Ruleset {
        Ruleset {
            rules: vec![[1, 1, 1, 1, 0, 1, 1, 1, 1], [1; 9]],
            fitness: 0.0,
        }
    }

    #[test]
    fn test_render_gray_levels() {
        let grid = Grid::from_cells(3, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]).unwrap();
        let img = render_phenotype(&grid, 3, None).to_luma8();

        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [127]);
        assert_eq!(img.get_pixel(2, 0).0, [255]);
    }

    #[test]
    fn test_render_tint_multiplies() {
        let grid = Grid::from_cells(3, vec![0, 1, 1, 1, 1, 1, 1, 1, 1]).unwrap();
        let img = render_phenotype(&grid, 2, Some([255, 128, 0])).to_rgb8();

        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 1).0, [255, 128, 0]);
    }

    #[test]
    fn test_save_progress() {
        let dir = tempdir().unwrap();
        let config = SearchConfig {
            num_shades: 2,
            target_iteration: 2,
            ..Default::default()
        };

        let path = save_progress(dir.path(), &carpet(), &config, 40).unwrap();
        assert_eq!(path.file_name().unwrap(), "progress-40.png");

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (9, 9));
        assert_eq!(img.get_pixel(4, 4).0, [0]);
        assert_eq!(img.get_pixel(3, 3).0, [255]);
        assert_eq!(img.get_pixel(1, 1).0, [255]);
    }
}
