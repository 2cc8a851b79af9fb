//! CLIP-backed similarity oracle.
//!
//! Scores are `logit_scale × cosine(image, label)`, the unnormalized logits a
//! CLIP model produces before softmax. Label embeddings are computed once per
//! distinct label list and optionally persisted to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::Config;
use crate::embedding::EmbeddingEngine;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Label;

use super::label_bank::LabelBank;
use super::oracle::SimilarityOracle;
use super::text_encoder::TextEncoder;
use super::vocabulary::{content_hash, Vocabulary};

/// Similarity oracle running CLIP visual and text encoders locally.
pub struct ClipOracle {
    engine: EmbeddingEngine,
    text_encoder: TextEncoder,
    logit_scale: f32,
    /// Label banks keyed by label-list content hash
    banks: RwLock<HashMap<String, Arc<LabelBank>>>,
    /// Where banks are persisted, if enabled
    bank_dir: Option<PathBuf>,
}

impl ClipOracle {
    /// Load both encoders for the configured model.
    pub fn load(config: &Config) -> PipelineResult<Self> {
        let model_dir = config.embedding_model_dir();
        let engine = EmbeddingEngine::load(&config.embedding, &model_dir)?;
        let text_encoder = TextEncoder::new(&model_dir)?;

        let bank_dir = config
            .embedding
            .cache_label_banks
            .then(|| config.label_bank_dir().join(&config.embedding.model));

        Ok(Self {
            engine,
            text_encoder,
            logit_scale: config.embedding.logit_scale,
            banks: RwLock::new(HashMap::new()),
            bank_dir,
        })
    }

    /// Encode the vocabulary ahead of the first request.
    pub fn warm(&self, vocabulary: &Vocabulary) -> PipelineResult<()> {
        self.bank_for(vocabulary.labels()).map(|_| ())
    }

    fn bank_for(&self, labels: &[Label]) -> PipelineResult<Arc<LabelBank>> {
        let hash = content_hash(labels);
        if let Some(bank) = self
            .banks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&hash)
        {
            return Ok(Arc::clone(bank));
        }

        let bank = Arc::new(self.load_or_encode(labels, &hash)?);
        self.banks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash, Arc::clone(&bank));
        Ok(bank)
    }

    fn load_or_encode(&self, labels: &[Label], hash: &str) -> PipelineResult<LabelBank> {
        let path = self.bank_path(hash);

        if let Some(path) = path.as_deref().filter(|p| p.exists()) {
            match LabelBank::load(path, hash) {
                Ok(bank) if bank.term_count() == labels.len() => return Ok(bank),
                Ok(_) => tracing::warn!("Label bank {:?} has the wrong size, re-encoding", path),
                Err(e) => tracing::warn!("Ignoring cached label bank: {e}"),
            }
        }

        let bank = LabelBank::encode_all(labels, &self.text_encoder, hash.to_string())?;
        if let Some(path) = path {
            if let Err(e) = bank.save(&path) {
                tracing::warn!("Could not persist label bank: {e}");
            }
        }
        Ok(bank)
    }

    fn bank_path(&self, hash: &str) -> Option<PathBuf> {
        self.bank_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.bin", &hash[..16.min(hash.len())])))
    }
}

impl SimilarityOracle for ClipOracle {
    fn score(&self, image: &Path, labels: &[Label]) -> PipelineResult<Vec<f32>> {
        let bank = self.bank_for(labels)?;
        let embedding = self.engine.embed_path(image)?;
        bank.similarities(&embedding, self.logit_scale)
            .map_err(|message| PipelineError::Scoring {
                path: image.to_path_buf(),
                message,
            })
    }
}
