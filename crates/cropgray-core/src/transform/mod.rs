//! Crop rectangles and region extraction.
//!
//! Crop rectangles arrive from pointer gestures as fractional pixel
//! coordinates with no ordering or bounds guarantees. This module resolves
//! them into an integer [`PixelRegion`] that is always non-empty and inside
//! the image, and extracts that region from a loaded image.
//!
//! # Coordinate System
//!
//! - Coordinates are in source image pixels
//! - Origin is the top-left corner
//! - `x2`/`y2` are exclusive edges

mod crop;

pub use crop::{apply_crop, CropError, CropRect, PixelRegion};
