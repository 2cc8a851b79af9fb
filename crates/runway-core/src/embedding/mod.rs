//! Image embedding via a CLIP visual encoder.
//!
//! Turns a photograph on disk into an L2-normalized vector in the same space
//! as the text encoder, using ONNX Runtime.
//!
//! # Usage
//!
//! ```rust,ignore
//! use runway_core::embedding::EmbeddingEngine;
//! use runway_core::Config;
//!
//! let config = Config::default();
//! let engine = EmbeddingEngine::load(&config.embedding, &config.embedding_model_dir())?;
//! let embedding = engine.embed_path("look.jpg".as_ref())?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod session;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::EmbeddingConfig;
use crate::error::PipelineError;

use self::preprocess::preprocess;
use self::session::VisualSession;

/// The visual encoder ONNX model filename.
pub const VISUAL_MODEL_FILENAME: &str = "visual.onnx";

/// Engine for generating image embeddings.
pub struct EmbeddingEngine {
    session: VisualSession,
    image_size: u32,
}

impl EmbeddingEngine {
    /// Load the visual encoder from the model directory.
    ///
    /// Expects the ONNX model at `{model_dir}/visual.onnx`.
    pub fn load(config: &EmbeddingConfig, model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = Self::model_path(model_dir);

        if !model_path.exists() {
            return Err(PipelineError::Model {
                message: format!(
                    "Visual encoder not found at {:?}. Run `runway models download` first.",
                    model_path
                ),
            });
        }

        tracing::info!("Loading visual encoder from {:?}", model_path);
        let session = VisualSession::load(&model_path)?;

        Ok(Self {
            session,
            image_size: config.image_size,
        })
    }

    /// Get the square input size of the encoder.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Generate a normalized embedding for a decoded image.
    pub fn embed(&self, image: &DynamicImage, path: &Path) -> Result<Vec<f32>, PipelineError> {
        let tensor = preprocess(image, self.image_size);
        self.session.embed(&tensor, path)
    }

    /// Decode the file at `path` and embed it.
    pub fn embed_path(&self, path: &Path) -> Result<Vec<f32>, PipelineError> {
        let image = decode(path)?;
        self.embed(&image, path)
    }

    /// Check whether the model file exists on disk.
    pub fn model_exists(model_dir: &Path) -> bool {
        Self::model_path(model_dir).exists()
    }

    /// Get the expected model file path.
    pub fn model_path(model_dir: &Path) -> PathBuf {
        model_dir.join(VISUAL_MODEL_FILENAME)
    }
}

/// BLAKE3 digest of a model file, hex encoded.
///
/// Streams the file so multi-hundred-megabyte encoders are never held in memory.
pub fn file_checksum(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Open and decode an image, detecting the format from its contents.
pub fn decode(path: &Path) -> Result<DynamicImage, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }

    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open image: {e}"),
        })?;

    if reader.format().is_none() {
        return Err(PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    reader.decode().map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
