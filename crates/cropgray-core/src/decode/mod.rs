//! Image loading for Cropgray.
//!
//! This module provides functionality for:
//! - Reading an image file from disk into an RGB buffer
//! - Decoding in-memory image bytes of any format the `image` crate recognises
//! - Applying the EXIF orientation so pixel coordinates match what the user sees
//!
//! # Examples
//!
//! ```ignore
//! use cropgray_core::decode::load_image;
//!
//! let image = load_image("photo.jpg")?;
//! println!("Loaded {}x{} image", image.width, image.height);
//! ```

mod load;
mod types;

pub use load::{decode_image, load_image};
pub use types::{DecodeError, DecodedImage, Orientation};
