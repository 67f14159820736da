//! Grayscale enhancement pipeline.
//!
//! The pipeline runs a fixed sequence over a cropped RGB region:
//!
//! 1. Grayscale conversion (always)
//! 2. Gaussian blur (when a kernel size is configured)
//! 3. CLAHE contrast enhancement (when both clip limit and tile grid are configured)
//!
//! Each step is also usable on its own.

mod blur;
mod clahe;
mod grayscale;

pub use blur::{gaussian_blur, kernel_sigma, kernel_weights, validate_kernel};
pub use clahe::{clahe, validate_clip_limit, validate_tile_grid, MAX_TILE_GRID};
pub use grayscale::to_grayscale;

use thiserror::Error;

use crate::config::EnhanceConfig;
use crate::decode::DecodedImage;
use crate::GrayImage;

/// Errors raised by enhancement parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnhanceError {
    /// Blur kernel size of zero.
    #[error("Blur kernel size must be positive")]
    ZeroKernel,

    /// Blur kernel size must be odd so the kernel has a centre tap.
    #[error("Blur kernel size must be odd, got {0}")]
    EvenKernel(u32),

    /// Clip limit that is zero, negative or not finite.
    #[error("Contrast clip limit must be a positive number, got {0}")]
    InvalidClipLimit(f32),

    /// Tile grid of zero.
    #[error("Contrast tile grid must be positive")]
    ZeroTileGrid,

    /// Tile grid above the supported maximum.
    #[error("Contrast tile grid must be at most {max}, got {grid}")]
    TileGridTooLarge { grid: u32, max: u32 },

    /// Output is always single-channel.
    #[error("Color output is not supported; grayscale must stay enabled")]
    GrayscaleDisabled,
}

/// Run the full enhancement pipeline over an RGB image.
///
/// # Errors
///
/// Returns an `EnhanceError` if the configuration is invalid. Nothing is
/// computed in that case.
pub fn enhance(image: &DecodedImage, config: &EnhanceConfig) -> Result<GrayImage, EnhanceError> {
    config.check()?;

    let mut gray = to_grayscale(image);

    if let Some(kernel) = config.blur_kernel {
        gray = gaussian_blur(&gray, kernel)?;
    }

    if let Some((clip_limit, tile_grid)) = config.contrast() {
        gray = clahe(&gray, clip_limit, tile_grid)?;
    }

    Ok(gray)
}
