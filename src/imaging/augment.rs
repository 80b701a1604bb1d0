//! Test-time augmentation views
//!
//! The five-view recipe is fixed: downstream confidence thresholds were
//! calibrated against exactly these transforms, so the rotation angle,
//! brightness factor and crop ratio must not drift.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Number of views produced per input image
pub const VIEW_COUNT: usize = 5;

/// Rotation applied to view 3, in degrees clockwise
const ROTATION_DEGREES: f32 = 10.0;
/// Fill value for corners exposed by the rotation
const ROTATION_FILL: Rgb<u8> = Rgb([128, 128, 128]);
/// Brightness multiplier for view 4
const BRIGHTNESS_FACTOR: f32 = 1.1;
/// Fraction of the shorter side kept by the center-crop zoom view
const ZOOM_CROP_RATIO: f32 = 0.9;

/// Produces the deterministic set of augmented views for TTA.
pub struct AugmentationSet {
    size: u32,
}

impl AugmentationSet {
    /// Create an augmentation set for `size` × `size` inputs
    pub fn new(size: u32) -> Self {
        Self {
            size,
        }
    }

    /// Generate all five views, eagerly and in fixed order:
    /// identity, mirror, rotation, brightness, center-crop zoom.
    ///
    /// Each view perturbs a distinct failure mode (orientation bias,
    /// rotation sensitivity, exposure variance, framing variance) without
    /// changing the semantic class. Pure: same input, same output.
    pub fn augment(&self, image: &RgbImage) -> Vec<RgbImage> {
        vec![
            image.clone(),
            imageops::flip_horizontal(image),
            rotate_about_center(
                image,
                ROTATION_DEGREES.to_radians(),
                Interpolation::Bilinear,
                ROTATION_FILL,
            ),
            brighten(image, BRIGHTNESS_FACTOR),
            self.center_crop_zoom(image),
        ]
    }

    /// Crop to 90% of the shorter side from the center, then resize back.
    fn center_crop_zoom(&self, image: &RgbImage) -> RgbImage {
        let (w, h) = image.dimensions();
        let crop_size = (w.min(h) as f32 * ZOOM_CROP_RATIO) as u32;
        let left = (w - crop_size) / 2;
        let top = (h - crop_size) / 2;

        let cropped = imageops::crop_imm(image, left, top, crop_size, crop_size).to_image();
        imageops::resize(&cropped, self.size, self.size, FilterType::Lanczos3)
    }
}

/// Multiply each channel by `factor`, clamped to the valid range.
fn brighten(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();

    ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb([
            (pixel[0] as f32 * factor).clamp(0.0, 255.0) as u8,
            (pixel[1] as f32 * factor).clamp(0.0, 255.0) as u8,
            (pixel[2] as f32 * factor).clamp(0.0, 255.0) as u8,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(size: u32) -> RgbImage {
        ImageBuffer::from_fn(size, size, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_five_views_all_square() {
        let augmentations = AugmentationSet::new(224);
        let views = augmentations.augment(&gradient_image(224));

        assert_eq!(views.len(), VIEW_COUNT);
        for view in &views {
            assert_eq!(view.dimensions(), (224, 224));
        }
    }

    #[test]
    fn test_first_view_is_identity() {
        let augmentations = AugmentationSet::new(64);
        let input = gradient_image(64);
        let views = augmentations.augment(&input);

        assert_eq!(views[0], input);
    }

    #[test]
    fn test_augmentation_is_deterministic() {
        let augmentations = AugmentationSet::new(64);
        let input = gradient_image(64);

        let first = augmentations.augment(&input);
        let second = augmentations.augment(&input);

        assert_eq!(first, second);
    }

    #[test]
    fn test_mirror_flips_pixels() {
        let augmentations = AugmentationSet::new(64);
        let input = gradient_image(64);
        let views = augmentations.augment(&input);

        assert_eq!(views[1].get_pixel(0, 0), input.get_pixel(63, 0));
    }

    #[test]
    fn test_brightness_clamps_at_white() {
        let white = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let brightened = brighten(&white, BRIGHTNESS_FACTOR);
        assert_eq!(brightened.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_brightness_scales_midtones() {
        let gray = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let brightened = brighten(&gray, BRIGHTNESS_FACTOR);
        assert_eq!(brightened.get_pixel(0, 0), &Rgb([110, 110, 110]));
    }

    #[test]
    fn test_zoom_view_resizes_back() {
        let augmentations = AugmentationSet::new(100);
        let views = augmentations.augment(&gradient_image(100));
        assert_eq!(views[4].dimensions(), (100, 100));
    }
}
