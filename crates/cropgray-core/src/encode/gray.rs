//! JPEG/PNG encoding of single-channel images.
//!
//! The output format is picked from the destination extension. Encoding
//! happens in memory before anything touches the filesystem, so a failed
//! encode never leaves a partial file behind.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::GrayImage;

/// JPEG quality used when saving, matching the common imaging-library default.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Errors that can occur while encoding or writing output.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Destination has no file extension to pick a format from.
    #[error("Cannot determine output format: {} has no extension", .0.display())]
    MissingExtension(PathBuf),

    /// Destination extension is not a supported output format.
    #[error("Unsupported output format {0:?} (expected jpg, jpeg or png)")]
    UnsupportedExtension(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the destination file failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy JPEG with quality 1-100.
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// Pick the format implied by a path's extension (case insensitive).
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| EncodeError::MissingExtension(path.to_path_buf()))?;

        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            "png" => Ok(OutputFormat::Png),
            _ => Err(EncodeError::UnsupportedExtension(ext.to_string())),
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// True for formats that reproduce pixels exactly.
    pub fn is_lossless(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

/// Encode a grayscale image.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for empty images and
/// `EncodeError::EncodingFailed` if the codec fails.
pub fn encode_gray(image: &GrayImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Jpeg { quality } => JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .write_image(image.as_raw(), width, height, ExtendedColorType::L8),
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::L8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a grayscale image in the format implied by `path` and write it.
///
/// Returns the format that was written.
pub fn save_gray(image: &GrayImage, path: impl AsRef<Path>) -> Result<OutputFormat, EncodeError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let bytes = encode_gray(image, format)?;

    fs::write(path, &bytes).map_err(|source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote {} bytes to {} as {:?}", bytes.len(), path.display(), format);
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ramp(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 3 + y * 5) % 256) as u8]))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("a.jpg")).unwrap(),
            OutputFormat::Jpeg { quality: DEFAULT_JPEG_QUALITY }
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("dir/b.JPEG")).unwrap(),
            OutputFormat::Jpeg { quality: DEFAULT_JPEG_QUALITY }
        );
        assert_eq!(OutputFormat::from_path(Path::new("c.Png")).unwrap(), OutputFormat::Png);
    }

    #[test]
    fn test_format_rejects_unknown_extension() {
        let err = OutputFormat::from_path(Path::new("out.gif")).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedExtension(ref e) if e == "gif"));

        let err = OutputFormat::from_path(Path::new("out")).unwrap_err();
        assert!(matches!(err, EncodeError::MissingExtension(_)));
    }

    #[test]
    fn test_extension_and_lossless() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg { quality: 90 }.extension(), "jpg");
        assert!(OutputFormat::Png.is_lossless());
        assert!(!OutputFormat::Jpeg { quality: 100 }.is_lossless());
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let bytes = encode_gray(&ramp(32, 16), OutputFormat::Jpeg { quality: 90 }).unwrap();

        // SOI and EOI markers
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_gray(&ramp(8, 8), OutputFormat::Png).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let img = ramp(20, 10);
        let bytes = encode_gray(&img, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().into_luma8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_encode_quality_clamping() {
        let img = ramp(10, 10);
        assert!(encode_gray(&img, OutputFormat::Jpeg { quality: 0 }).is_ok());
        assert!(encode_gray(&img, OutputFormat::Jpeg { quality: 255 }).is_ok());
    }

    #[test]
    fn test_encode_empty_image() {
        let err = encode_gray(&GrayImage::new(0, 5), OutputFormat::Png).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidDimensions { width: 0, height: 5 }));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let format = save_gray(&ramp(12, 12), &path).unwrap();
        assert_eq!(format, OutputFormat::Png);
        assert!(path.exists());
    }

    #[test]
    fn test_save_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tiff");

        assert!(save_gray(&ramp(4, 4), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = save_gray(&ramp(4, 4), &path).unwrap_err();
        assert!(matches!(err, EncodeError::Io { .. }));
    }
}
