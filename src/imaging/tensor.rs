//! Standardization of images into model-ready tensors

use image::RgbImage;

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// A standardized, channel-first input tensor with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    /// Tensor shape, always `[1, 3, S, S]`
    pub shape: Vec<i64>,
    /// Flattened NCHW data
    pub data: Vec<f32>,
}

/// Scale to [0, 1], subtract the per-channel ImageNet mean, divide by the
/// per-channel std, transpose to channel-first and add the batch dimension.
pub fn standardize(image: &RgbImage) -> InputTensor {
    let (width, height) = image.dimensions();
    let num_pixels = (width * height) as usize;

    // CHW layout: all R values, then all G values, then all B values
    let mut data = vec![0.0f32; 3 * num_pixels];
    for (i, pixel) in image.pixels().enumerate() {
        for c in 0..3 {
            data[c * num_pixels + i] =
                (pixel[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    InputTensor {
        shape: vec![1, 3, i64::from(height), i64::from(width)],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_shape_and_length() {
        let image = RgbImage::new(224, 224);
        let tensor = standardize(&image);

        assert_eq!(tensor.shape, vec![1, 3, 224, 224]);
        assert_eq!(tensor.data.len(), 3 * 224 * 224);
    }

    #[test]
    fn test_channel_values() {
        let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 128]));
        let tensor = standardize(&image);

        let r = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let g = (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        let b = (128.0 / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];

        assert!((tensor.data[0] - r).abs() < 1e-6);
        assert!((tensor.data[4] - g).abs() < 1e-6);
        assert!((tensor.data[8] - b).abs() < 1e-6);
    }
}
