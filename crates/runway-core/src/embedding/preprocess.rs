//! Image preprocessing for the CLIP visual encoder.
//!
//! The encoder expects:
//! - Input size: `image_size × image_size` (224 for ViT-B/32)
//! - Normalization: per-channel `(pixel/255 - mean) / std` with CLIP's constants
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP per-channel normalization mean.
const NORM_MEAN: [f32; CHANNELS] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP per-channel normalization std.
const NORM_STD: [f32; CHANNELS] = [0.268_629_54, 0.261_302_58, 0.275_777_1];

/// Preprocess an image for the visual encoder.
///
/// Resizes the shorter edge to `image_size`, center-crops to a square, and
/// returns a normalized NCHW tensor.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    let cropped = resize_and_center_crop(image, image_size);
    let rgb = cropped.to_rgb8();

    let size = image_size as usize;
    let plane = size * size;
    let mut data = vec![0.0f32; CHANNELS * plane];

    for (i, pixel) in rgb.as_raw().chunks_exact(CHANNELS).enumerate() {
        for (c, &val) in pixel.iter().enumerate() {
            data[c * plane + i] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    Array4::from_shape_vec((1, CHANNELS, size, size), data)
        .unwrap_or_else(|_| Array4::zeros((1, CHANNELS, size, size)))
}

fn resize_and_center_crop(image: &DynamicImage, size: u32) -> DynamicImage {
    let (w, h) = (image.width().max(1), image.height().max(1));
    let scale = size as f32 / w.min(h) as f32;
    let new_w = ((w as f32 * scale).round() as u32).max(size);
    let new_h = ((h as f32 * scale).round() as u32).max(size);

    let resized = image.resize_exact(new_w, new_h, FilterType::CatmullRom);
    let x = (new_w - size) / 2;
    let y = (new_h - size) / 2;
    resized.crop_imm(x, y, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_preprocess_shape_for_portrait_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(400, 600));
        let tensor = preprocess(&img, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_shape_for_tiny_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(3, 2));
        let tensor = preprocess(&img, 32);
        assert_eq!(tensor.shape(), &[1, 3, 32, 32]);
    }

    #[test]
    fn test_preprocess_normalizes_per_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 255])));
        let tensor = preprocess(&img, 4);

        let red = tensor[[0, 0, 1, 1]];
        let green = tensor[[0, 1, 1, 1]];
        assert!((red - (1.0 - NORM_MEAN[0]) / NORM_STD[0]).abs() < 0.02);
        assert!((green - (-NORM_MEAN[1] / NORM_STD[1])).abs() < 0.02);
    }
}
