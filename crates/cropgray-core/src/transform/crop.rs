//! Image cropping operations.
//!
//! A [`CropRect`] is stored exactly as the user supplied it. Validation happens
//! only when the rectangle is resolved against an image:
//!
//! 1. Non-finite coordinates are rejected
//! 2. Inverted corners are swapped
//! 3. Edges are clamped to `[0, width] x [0, height]`
//! 4. Edges are truncated toward zero
//! 5. A zero-area result is rejected
//!
//! # Example
//!
//! ```ignore
//! let rect = CropRect::new(10.0, 10.0, 60.0, 60.0);
//! let region = rect.resolve(image.width, image.height)?;
//! let cropped = apply_crop(&image, region)?;
//! assert_eq!(cropped.width, 50);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors raised when a crop rectangle cannot be mapped onto an image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// One of the coordinates is NaN or infinite.
    #[error("Crop coordinates must be finite, got ({x1}, {y1}, {x2}, {y2})")]
    NonFinite { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// The rectangle covers no pixels once clamped to the image.
    #[error("Crop region is empty within the {width}x{height} image")]
    Degenerate { width: u32, height: u32 },

    /// A pixel region reaches past the edge of the image it is applied to.
    #[error("Crop region {region:?} exceeds the {width}x{height} image")]
    OutOfBounds {
        region: PixelRegion,
        width: u32,
        height: u32,
    },
}

/// Crop rectangle in image pixel coordinates, as produced by a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CropRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle covering an entire `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Rectangle spanned by a press point and a release point.
    pub fn from_corners(press: (f64, f64), release: (f64, f64)) -> Self {
        Self::new(press.0, press.1, release.0, release.1)
    }

    /// Absolute horizontal and vertical extent, before any clamping.
    pub fn span(&self) -> (f64, f64) {
        ((self.x2 - self.x1).abs(), (self.y2 - self.y1).abs())
    }

    /// Resolve this rectangle to a pixel region inside a `width` x `height` image.
    ///
    /// # Errors
    ///
    /// Returns `CropError::NonFinite` for NaN/infinite coordinates and
    /// `CropError::Degenerate` when nothing of the rectangle lies inside the
    /// image.
    pub fn resolve(&self, width: u32, height: u32) -> Result<PixelRegion, CropError> {
        let coords = [self.x1, self.y1, self.x2, self.y2];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(CropError::NonFinite {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }

        let (left, right) = clamp_span(self.x1, self.x2, width);
        let (top, bottom) = clamp_span(self.y1, self.y2, height);

        if right <= left || bottom <= top {
            return Err(CropError::Degenerate { width, height });
        }

        Ok(PixelRegion {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

/// Order two edges, clamp them to `[0, limit]` and truncate to whole pixels.
fn clamp_span(a: f64, b: f64, limit: u32) -> (u32, u32) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let max = limit as f64;
    (lo.clamp(0.0, max) as u32, hi.clamp(0.0, max) as u32)
}

/// A non-empty, in-bounds rectangle of whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Region covering an entire image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True if this region is the whole of a `width` x `height` image.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }
}

/// Copy a pixel region out of an image.
///
/// # Errors
///
/// Returns `CropError::OutOfBounds` if the region does not fit inside the
/// image, which happens when it was resolved against other dimensions.
pub fn apply_crop(image: &DecodedImage, region: PixelRegion) -> Result<DecodedImage, CropError> {
    if region.covers(image.width, image.height) {
        return Ok(image.clone());
    }

    if region.width == 0
        || region.height == 0
        || region.x as u64 + region.width as u64 > image.width as u64
        || region.y as u64 + region.height as u64 > image.height as u64
    {
        return Err(CropError::OutOfBounds {
            region,
            width: image.width,
            height: image.height,
        });
    }

    let src_stride = image.width as usize * 3;
    let row_len = region.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * region.height as usize);

    for y in region.y..region.bottom() {
        let start = y as usize * src_stride + region.x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(region.width, region.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_full_rect_resolves_to_full_region() {
        let region = CropRect::full(100, 80).resolve(100, 80).unwrap();
        assert_eq!(region, PixelRegion::full(100, 80));
        assert!(region.covers(100, 80));
    }

    #[test]
    fn test_resolve_inside_bounds() {
        let region = CropRect::new(10.0, 10.0, 60.0, 60.0).resolve(100, 100).unwrap();
        assert_eq!(region, PixelRegion { x: 10, y: 10, width: 50, height: 50 });
    }

    #[test]
    fn test_resolve_truncates_fractional_coordinates() {
        let region = CropRect::new(10.7, 5.2, 60.9, 30.99).resolve(100, 100).unwrap();
        assert_eq!(region, PixelRegion { x: 10, y: 5, width: 50, height: 25 });
    }

    #[test]
    fn test_resolve_swaps_inverted_corners() {
        let forward = CropRect::new(20.0, 30.0, 70.0, 90.0).resolve(100, 100).unwrap();
        let inverted = CropRect::new(70.0, 90.0, 20.0, 30.0).resolve(100, 100).unwrap();
        assert_eq!(forward, inverted);
    }

    #[test]
    fn test_resolve_clamps_to_bounds() {
        let region = CropRect::new(-15.0, -3.0, 250.0, 40.0).resolve(100, 50).unwrap();
        assert_eq!(region, PixelRegion { x: 0, y: 0, width: 100, height: 40 });
    }

    #[test]
    fn test_resolve_zero_width_is_degenerate() {
        let err = CropRect::new(10.0, 10.0, 10.0, 60.0).resolve(100, 100).unwrap_err();
        assert_eq!(err, CropError::Degenerate { width: 100, height: 100 });
    }

    #[test]
    fn test_resolve_sub_pixel_is_degenerate() {
        // Both edges truncate to 10
        let err = CropRect::new(10.2, 10.0, 10.8, 60.0).resolve(100, 100);
        assert!(matches!(err, Err(CropError::Degenerate { .. })));
    }

    #[test]
    fn test_resolve_outside_image_is_degenerate() {
        let err = CropRect::new(150.0, 150.0, 200.0, 200.0).resolve(100, 100);
        assert!(matches!(err, Err(CropError::Degenerate { .. })));

        let err = CropRect::new(-50.0, -50.0, -1.0, -1.0).resolve(100, 100);
        assert!(matches!(err, Err(CropError::Degenerate { .. })));
    }

    #[test]
    fn test_resolve_rejects_nan() {
        let err = CropRect::new(f64::NAN, 0.0, 10.0, 10.0).resolve(100, 100);
        assert!(matches!(err, Err(CropError::NonFinite { .. })));

        let err = CropRect::new(0.0, 0.0, f64::INFINITY, 10.0).resolve(100, 100);
        assert!(matches!(err, Err(CropError::NonFinite { .. })));
    }

    #[test]
    fn test_span_is_absolute() {
        let rect = CropRect::from_corners((50.0, 40.0), (20.0, 45.0));
        assert_eq!(rect.span(), (30.0, 5.0));
    }

    #[test]
    fn test_crop_pixel_values_preserved() {
        let img = test_image(10, 10);
        let region = CropRect::new(3.0, 3.0, 7.0, 7.0).resolve(10, 10).unwrap();
        let result = apply_crop(&img, region).unwrap();

        assert_eq!(result.dimensions(), (4, 4));
        // Value at (3, 3) = 3 * 10 + 3 = 33
        assert_eq!(result.rgb_at(0, 0), [33, 33, 33]);
        // Value at (6, 6) = 66
        assert_eq!(result.rgb_at(3, 3), [66, 66, 66]);
    }

    #[test]
    fn test_crop_rectangular() {
        let img = test_image(200, 100);
        let result = apply_crop(&img, PixelRegion { x: 0, y: 0, width: 50, height: 100 }).unwrap();

        assert_eq!(result.width, 50);
        assert_eq!(result.height, 100);
        assert_eq!(result.pixels.len(), 50 * 100 * 3);
    }

    #[test]
    fn test_identity_crop() {
        let img = test_image(50, 50);
        let result = apply_crop(&img, PixelRegion::full(50, 50)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_crop_region_from_other_image_is_rejected() {
        let img = test_image(10, 10);
        let region = CropRect::new(5.0, 5.0, 15.0, 15.0).resolve(20, 20).unwrap();

        assert_eq!(
            apply_crop(&img, region),
            Err(CropError::OutOfBounds { region, width: 10, height: 10 })
        );
    }

    #[test]
    fn test_crop_rejects_empty_and_overflowing_regions() {
        let img = test_image(10, 10);

        let empty = PixelRegion { x: 2, y: 2, width: 0, height: 3 };
        assert!(matches!(apply_crop(&img, empty), Err(CropError::OutOfBounds { .. })));

        let overflow = PixelRegion { x: u32::MAX, y: 0, width: 2, height: 2 };
        assert!(matches!(apply_crop(&img, overflow), Err(CropError::OutOfBounds { .. })));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
