//! Image encoding for Cropgray.
//!
//! This module provides functionality for:
//! - Choosing an output format from a file extension
//! - Encoding single-channel images to JPEG or PNG
//! - Writing the encoded bytes to disk
//!
//! # Examples
//!
//! ```ignore
//! use cropgray_core::encode::save_gray;
//!
//! let format = save_gray(&processed, "out.png")?;
//! println!("Wrote {:?}", format);
//! ```

mod gray;

pub use gray::{encode_gray, save_gray, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
