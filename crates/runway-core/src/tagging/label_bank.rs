//! Pre-computed label embeddings for fast scoring.
//!
//! The label bank stores one normalized text embedding per label as the rows
//! of an N×D matrix, in label order, so scoring an image is a single
//! matrix-vector product.

use std::path::Path;

use ndarray::Array2;

use crate::error::PipelineError;
use crate::types::Label;

use super::text_encoder::TextEncoder;

/// Labels encoded per ONNX call.
const ENCODE_BATCH_SIZE: usize = 64;

fn model_error(message: String) -> PipelineError {
    PipelineError::Model { message }
}

/// Label embeddings for one vocabulary.
#[derive(Debug, Clone)]
pub struct LabelBank {
    /// N × D, row `i` is label `i`
    matrix: Array2<f32>,
    /// Content hash of the label list this bank was built for
    vocab_hash: String,
}

impl LabelBank {
    /// Build a bank from already-normalized rows.
    pub fn from_rows(rows: Vec<Vec<f32>>, vocab_hash: String) -> Result<Self, PipelineError> {
        let term_count = rows.len();
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != dim) {
            return Err(model_error(
                "Label embeddings have inconsistent dimensions".to_string(),
            ));
        }

        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let matrix = Array2::from_shape_vec((term_count, dim), flat)
            .map_err(|e| model_error(format!("Invalid label bank shape: {e}")))?;
        Ok(Self { matrix, vocab_hash })
    }

    /// Encode every label with the text encoder.
    ///
    /// Labels are encoded as-is, without a prompt template.
    pub fn encode_all(
        labels: &[Label],
        text_encoder: &TextEncoder,
        vocab_hash: String,
    ) -> Result<Self, PipelineError> {
        tracing::info!("Encoding {} labels...", labels.len());

        let mut rows = Vec::with_capacity(labels.len());
        for chunk in labels.chunks(ENCODE_BATCH_SIZE) {
            rows.extend(text_encoder.encode_batch(chunk)?);
        }

        if rows.len() != labels.len() {
            return Err(model_error(format!(
                "Text encoder returned {} embeddings for {} labels",
                rows.len(),
                labels.len()
            )));
        }

        let bank = Self::from_rows(rows, vocab_hash)?;
        tracing::info!(
            "Label bank ready: {} labels x {} dims",
            bank.term_count(),
            bank.embedding_dim()
        );
        Ok(bank)
    }

    /// Save as raw little-endian f32 plus a `.meta` sidecar.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| model_error(format!("Failed to create {:?}: {e}", parent)))?;
        }

        let bytes: Vec<u8> = self.matrix.iter().flat_map(|f| f.to_le_bytes()).collect();
        std::fs::write(path, &bytes)
            .map_err(|e| model_error(format!("Failed to save label bank to {:?}: {e}", path)))?;

        let meta_path = path.with_extension("meta");
        let meta = format!(
            "vocab_hash={}\nterm_count={}\nembedding_dim={}\n",
            self.vocab_hash,
            self.term_count(),
            self.embedding_dim()
        );
        std::fs::write(&meta_path, meta).map_err(|e| {
            model_error(format!(
                "Failed to save label bank metadata to {:?}: {e}",
                meta_path
            ))
        })?;

        tracing::debug!("Saved label bank to {:?}", path);
        Ok(())
    }

    /// Load a bank saved by [`save`](Self::save).
    ///
    /// Fails if the sidecar's hash differs from `vocab_hash` or sizes disagree.
    pub fn load(path: &Path, vocab_hash: &str) -> Result<Self, PipelineError> {
        let meta_path = path.with_extension("meta");
        let meta = std::fs::read_to_string(&meta_path)
            .map_err(|e| model_error(format!("Failed to read {:?}: {e}", meta_path)))?;

        let field = |key: &str| {
            meta.lines()
                .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
                .map(str::to_string)
        };

        let stored_hash = field("vocab_hash").unwrap_or_default();
        if stored_hash != vocab_hash {
            return Err(model_error(format!(
                "Label bank {:?} was built for a different vocabulary",
                path
            )));
        }

        let parse = |key: &str| -> Result<usize, PipelineError> {
            field(key)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| model_error(format!("Label bank metadata missing {key}")))
        };
        let term_count = parse("term_count")?;
        let dim = parse("embedding_dim")?;

        let bytes = std::fs::read(path)
            .map_err(|e| model_error(format!("Failed to read label bank {:?}: {e}", path)))?;
        if bytes.len() != term_count * dim * 4 {
            return Err(model_error(format!(
                "Label bank size mismatch: expected {} bytes, got {}",
                term_count * dim * 4,
                bytes.len()
            )));
        }

        let flat: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        let matrix = Array2::from_shape_vec((term_count, dim), flat)
            .map_err(|e| model_error(format!("Invalid label bank shape: {e}")))?;

        tracing::info!("Loaded label bank: {} labels from {:?}", term_count, path);
        Ok(Self {
            matrix,
            vocab_hash: vocab_hash.to_string(),
        })
    }

    /// `scale × cosine` between `image_embedding` and every label, in label order.
    pub fn similarities(&self, image_embedding: &[f32], scale: f32) -> Result<Vec<f32>, String> {
        if image_embedding.len() != self.embedding_dim() {
            return Err(format!(
                "Image embedding has {} dims, label bank has {}",
                image_embedding.len(),
                self.embedding_dim()
            ));
        }
        Ok(crate::math::scaled_similarities(
            &self.matrix,
            image_embedding,
            scale,
        ))
    }

    pub fn term_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn embedding_dim(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn vocab_hash(&self) -> &str {
        &self.vocab_hash
    }
}
