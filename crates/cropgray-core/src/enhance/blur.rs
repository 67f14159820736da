//! Gaussian smoothing with an explicit kernel size.
//!
//! Kernel sizes follow the usual desktop-imaging convention: the size is the
//! full width of the square kernel and must be odd. The standard deviation is
//! derived from the size as `0.3 * ((k - 1) * 0.5 - 1) + 0.8`, so a 5x5
//! kernel blurs with sigma 1.1.
//!
//! The filter has exactly `k` taps per axis, so no pixel further than
//! `k / 2` from the centre contributes. Edges replicate the border pixel.

use image::{ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

use super::EnhanceError;
use crate::GrayImage;

/// Check that a kernel size is usable: positive and odd.
pub fn validate_kernel(kernel: u32) -> Result<(), EnhanceError> {
    if kernel == 0 {
        return Err(EnhanceError::ZeroKernel);
    }
    if kernel % 2 == 0 {
        return Err(EnhanceError::EvenKernel(kernel));
    }
    Ok(())
}

/// Standard deviation used for a kernel of the given size.
#[inline]
pub fn kernel_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1-D Gaussian weights with exactly `kernel` taps.
pub fn kernel_weights(kernel: u32) -> Vec<f32> {
    let sigma = kernel_sigma(kernel);
    let half = (kernel / 2) as i32;
    let weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();

    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Blur a grayscale image with a separable Gaussian of the given kernel size.
///
/// A kernel size of 1 is the identity.
///
/// # Errors
///
/// Returns `EnhanceError::ZeroKernel` or `EnhanceError::EvenKernel` for
/// unusable sizes. Even sizes are never rounded.
pub fn gaussian_blur(image: &GrayImage, kernel: u32) -> Result<GrayImage, EnhanceError> {
    validate_kernel(kernel)?;

    if kernel == 1 {
        return Ok(image.clone());
    }

    // Filter in f32 so the two passes round once instead of truncating twice
    let (width, height) = image.dimensions();
    let input: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[0] as f32]));
    let blurred = separable_filter_equal(&input, &kernel_weights(kernel));

    Ok(GrayImage::from_fn(width, height, |x, y| {
        Luma([blurred.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    }))
}
