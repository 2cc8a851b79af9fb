//! Thumbnail encoding for inline display.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::config::ThumbnailConfig;
use crate::embedding::decode;
use crate::error::{PipelineError, PipelineResult};

/// Turns an image file into a payload that can be embedded in a page.
pub trait ThumbnailCodec: Send + Sync {
    /// Encode the image at `path`. An empty string means "no thumbnail".
    fn encode(&self, path: &Path) -> PipelineResult<String>;
}

/// Base64 JPEG thumbnails fitted inside a square bounding box.
pub struct JpegThumbnailer {
    config: ThumbnailConfig,
}

impl JpegThumbnailer {
    /// Create a new thumbnailer with the given configuration.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Encode an already-decoded image as base64 JPEG.
    pub fn encode_image(&self, image: &DynamicImage, path: &Path) -> PipelineResult<String> {
        // Shrink only; images already inside the box keep their dimensions
        let size = self.config.size;
        let rgb = if image.width() <= size && image.height() <= size {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            DynamicImage::ImageRgb8(image.thumbnail(size, size).to_rgb8())
        };

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.config.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| PipelineError::Thumbnail {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(BASE64.encode(buffer))
    }
}

impl ThumbnailCodec for JpegThumbnailer {
    fn encode(&self, path: &Path) -> PipelineResult<String> {
        if !self.config.enabled {
            return Ok(String::new());
        }
        let image = decode(path)?;
        self.encode_image(&image, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, size: u32) -> ThumbnailConfig {
        ThumbnailConfig {
            enabled,
            size,
            quality: 90,
        }
    }

    fn decode_payload(payload: &str) -> DynamicImage {
        let bytes = BASE64.decode(payload).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "payload should be a JPEG");
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_thumbnail_fits_bounding_box() {
        let thumbnailer = JpegThumbnailer::new(config(true, 100));
        let img = DynamicImage::new_rgb8(1000, 500);
        let payload = thumbnailer.encode_image(&img, Path::new("wide.jpg")).unwrap();

        let thumb = decode_payload(&payload);
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
    }

    #[test]
    fn test_small_images_are_not_enlarged() {
        let thumbnailer = JpegThumbnailer::new(config(true, 400));
        let img = DynamicImage::new_rgb8(60, 90);
        let payload = thumbnailer.encode_image(&img, Path::new("small.jpg")).unwrap();

        let thumb = decode_payload(&payload);
        assert_eq!((thumb.width(), thumb.height()), (60, 90));
    }

    #[test]
    fn test_image_exactly_at_box_size_is_kept() {
        let thumbnailer = JpegThumbnailer::new(config(true, 64));
        let img = DynamicImage::new_rgb8(64, 32);
        let payload = thumbnailer.encode_image(&img, Path::new("edge.jpg")).unwrap();

        let thumb = decode_payload(&payload);
        assert_eq!((thumb.width(), thumb.height()), (64, 32));
    }

    #[test]
    fn test_alpha_images_are_flattened() {
        let thumbnailer = JpegThumbnailer::new(config(true, 64));
        let img = DynamicImage::new_rgba8(64, 128);
        let payload = thumbnailer.encode_image(&img, Path::new("alpha.png")).unwrap();
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_encode_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.png");
        image::RgbImage::new(40, 80).save(&path).unwrap();

        let payload = JpegThumbnailer::new(config(true, 20)).encode(&path).unwrap();
        let thumb = decode_payload(&payload);
        assert_eq!((thumb.width(), thumb.height()), (10, 20));
    }

    #[test]
    fn test_disabled_returns_empty_payload() {
        let thumbnailer = JpegThumbnailer::new(config(false, 100));
        let payload = thumbnailer.encode(Path::new("/nonexistent.jpg")).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        assert!(JpegThumbnailer::new(config(true, 100)).encode(&path).is_err());
    }
}
