//! Image adapters: posterized target loading and phenotype rendering.
//!
//! These sit at the edge of the crate; the search itself only sees
//! [`ShadeGrid`](crate::schema::ShadeGrid) values.

mod render;
mod target;

pub use render::*;
pub use target::*;

/// Image loading and saving errors.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Image I/O failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Filesystem I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "Invalid image. You need to specify a target image that is {expected} x {expected} pixels large (got {width} x {height})"
    )]
    InvalidDimensions {
        expected: usize,
        width: u32,
        height: u32,
    },
}
