//! Image normalization for real-world photographs
//!
//! Turns arbitrary input bytes into a fixed-size, aspect-corrected RGB
//! image ready for augmentation and standardization.

use crate::error::Result;
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

/// Aspect ratio above which an image is considered very wide
const WIDE_ASPECT: f64 = 1.5;
/// Aspect ratio below which an image is considered very tall
const TALL_ASPECT: f64 = 0.667;
/// Crop ratio applied to the shorter axis for extreme aspect ratios
const CROP_RATIO: f64 = 1.2;

/// Normalizes raw image bytes into an exact S×S×3 image.
pub struct ImagePreprocessor {
    target_size: u32,
}

impl ImagePreprocessor {
    /// Create a preprocessor producing `target_size` × `target_size` images
    pub fn new(target_size: u32) -> Self {
        Self {
            target_size,
        }
    }

    /// Decode and normalize raw bytes.
    ///
    /// Extreme aspect ratios get a center crop before the resize, which
    /// suppresses borders, watermarks and caption strips. Crop math clamps
    /// to image bounds, so malformed-but-decodable images cannot fail here.
    pub fn normalize(&self, raw: &[u8]) -> Result<RgbImage> {
        let decoded = image::load_from_memory(raw)?;
        // Force 3-channel RGB regardless of source layout (alpha, greyscale)
        let rgb = decoded.to_rgb8();

        let cropped = Self::crop_extreme_aspect(rgb);
        let resized = imageops::resize(
            &cropped,
            self.target_size,
            self.target_size,
            FilterType::Lanczos3,
        );

        Ok(resized)
    }

    /// Target output edge length
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Center-crop very wide or very tall images to a 1.2:1 ratio on the
    /// shorter axis. Images with ordinary aspect ratios pass through.
    fn crop_extreme_aspect(image: RgbImage) -> RgbImage {
        let (w, h) = image.dimensions();
        let aspect = f64::from(w) / f64::from(h);

        if aspect > WIDE_ASPECT {
            let new_w = ((f64::from(h) * CROP_RATIO) as u32).min(w);
            let left = (w - new_w) / 2;
            debug!(width = w, height = h, crop_width = new_w, "Cropping wide image");
            imageops::crop_imm(&image, left, 0, new_w, h).to_image()
        } else if aspect < TALL_ASPECT {
            let new_h = ((f64::from(w) * CROP_RATIO) as u32).min(h);
            let top = (h - new_h) / 2;
            debug!(width = w, height = h, crop_height = new_h, "Cropping tall image");
            imageops::crop_imm(&image, 0, top, w, new_h).to_image()
        } else {
            image
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_output_is_exact_square() {
        let preprocessor = ImagePreprocessor::new(260);
        let bytes = png_bytes(RgbImage::from_pixel(300, 300, Rgb([40, 120, 40])));

        let normalized = preprocessor.normalize(&bytes).unwrap();
        assert_eq!(normalized.dimensions(), (260, 260));
    }

    #[test]
    fn test_wide_image_crops_to_ratio() {
        // 400x200 has aspect 2.0: crop width must equal height * 1.2 = 240
        let cropped = ImagePreprocessor::crop_extreme_aspect(RgbImage::new(400, 200));
        assert_eq!(cropped.dimensions(), (240, 200));
    }

    #[test]
    fn test_tall_image_crops_to_ratio() {
        let cropped = ImagePreprocessor::crop_extreme_aspect(RgbImage::new(200, 400));
        assert_eq!(cropped.dimensions(), (200, 240));
    }

    #[test]
    fn test_ordinary_aspect_passes_through() {
        let cropped = ImagePreprocessor::crop_extreme_aspect(RgbImage::new(300, 250));
        assert_eq!(cropped.dimensions(), (300, 250));
    }

    #[test]
    fn test_boundary_aspect_passes_through() {
        // Exactly 1.5 is not "very wide"
        let cropped = ImagePreprocessor::crop_extreme_aspect(RgbImage::new(300, 200));
        assert_eq!(cropped.dimensions(), (300, 200));
    }

    #[test]
    fn test_wide_end_to_end_still_square() {
        let preprocessor = ImagePreprocessor::new(224);
        let bytes = png_bytes(RgbImage::from_pixel(400, 200, Rgb([10, 200, 10])));

        let normalized = preprocessor.normalize(&bytes).unwrap();
        assert_eq!(normalized.dimensions(), (224, 224));
    }

    #[test]
    fn test_greyscale_converts_to_rgb() {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image::GrayImage::from_pixel(64, 64, image::Luma([200])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let preprocessor = ImagePreprocessor::new(224);
        let normalized = preprocessor.normalize(&bytes).unwrap();
        assert_eq!(normalized.dimensions(), (224, 224));
        assert_eq!(normalized.get_pixel(0, 0), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_undecodable_bytes_fail_with_decode_error() {
        let preprocessor = ImagePreprocessor::new(224);
        let err = preprocessor.normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, crate::error::Error::Decode(_)));
    }
}
