//! RGB to single-channel conversion.

use image::Luma;

use crate::decode::DecodedImage;
use crate::luminance::calculate_luma_u8;
use crate::GrayImage;

/// Convert an RGB image to 8-bit luma (ITU-R BT.601 weights).
pub fn to_grayscale(image: &DecodedImage) -> GrayImage {
    GrayImage::from_fn(image.width, image.height, |x, y| {
        let [r, g, b] = image.rgb_at(x, y);
        Luma([calculate_luma_u8(r, g, b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_pixels_unchanged() {
        let img = DecodedImage::new(3, 1, vec![0, 0, 0, 128, 128, 128, 255, 255, 255]);
        let gray = to_grayscale(&img);

        assert_eq!(gray.dimensions(), (3, 1));
        assert_eq!(gray.as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn test_color_pixels_weighted() {
        let img = DecodedImage::new(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]);
        let gray = to_grayscale(&img);

        assert_eq!(gray.as_raw(), &vec![76, 150, 29]);
    }

    #[test]
    fn test_row_major_layout() {
        // 2x2: top row dark, bottom row bright
        let img = DecodedImage::new(2, 2, vec![10, 10, 10, 20, 20, 20, 200, 200, 200, 250, 250, 250]);
        let gray = to_grayscale(&img);

        assert_eq!(gray.get_pixel(0, 0)[0], 10);
        assert_eq!(gray.get_pixel(1, 0)[0], 20);
        assert_eq!(gray.get_pixel(0, 1)[0], 200);
        assert_eq!(gray.get_pixel(1, 1)[0], 250);
    }
}
