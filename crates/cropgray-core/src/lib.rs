//! Cropgray Core - crop-and-enhance image processing library
//!
//! This crate provides the engine behind Cropgray: loading an image, mapping a
//! dragged rectangle onto pixel coordinates, converting the selected region to
//! grayscale with optional blur and CLAHE contrast enhancement, and writing the
//! result back to disk.
//!
//! # Module Structure
//!
//! - `decode` - Loading images from disk or memory (EXIF orientation aware)
//! - `transform` - Crop rectangles and region extraction
//! - `enhance` - Grayscale conversion, Gaussian blur, CLAHE
//! - `encode` - JPEG/PNG output for single-channel images
//! - `config` - Enhancement settings and settings-form parsing
//! - `session` - The interactive crop-and-enhance session
//!
//! # Example
//!
//! ```ignore
//! use cropgray_core::{EnhanceConfig, Session};
//!
//! let mut session = Session::load("scan.jpg", EnhanceConfig::default())?;
//! session.update_crop(10.0, 10.0, 410.0, 310.0);
//! let preview = session.apply()?;
//! println!("{}x{}", preview.width(), preview.height());
//! session.save("scan-gray.png")?;
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod enhance;
pub mod luminance;
pub mod session;
pub mod transform;

pub use config::{ConfigError, EnhanceConfig, SettingsForm};
pub use decode::{load_image, DecodeError, DecodedImage};
pub use encode::{save_gray, EncodeError, OutputFormat};
pub use enhance::{enhance, EnhanceError};
pub use session::{ProcessedImage, Session, SessionError, SessionState, MIN_SELECTION_SPAN};
pub use transform::{apply_crop, CropError, CropRect, PixelRegion};

/// Single-channel 8-bit image produced by the enhancement pipeline.
pub type GrayImage = image::GrayImage;
