//! Image loading with EXIF orientation handling.

use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Read an image file from disk.
///
/// # Errors
///
/// Returns `DecodeError::NotFound` if the path does not exist,
/// `DecodeError::Io` for other read failures and
/// `DecodeError::CorruptedFile` if the contents cannot be decoded.
pub fn load_image(path: impl AsRef<Path>) -> Result<DecodedImage, DecodeError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DecodeError::NotFound(path.to_path_buf()),
        _ => DecodeError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let image = decode_image(&bytes)?;
    log::debug!(
        "Loaded {} ({}x{}, {} bytes)",
        path.display(),
        image.width,
        image.height,
        bytes.len()
    );
    Ok(image)
}

/// Decode image bytes, applying EXIF orientation correction.
///
/// The format is guessed from the content, so JPEG, PNG and BMP input all
/// go through the same path.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the bytes are not a decodable image.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if orientation != Orientation::Normal {
        log::debug!("Applying EXIF orientation {:?}", orientation);
    }
    let oriented = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgb_image(oriented.into_rgb8()))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
