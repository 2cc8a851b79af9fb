//! CLIP text encoder for label embeddings.
//!
//! Loads the text ONNX model and its tokenizer, and encodes label phrases to
//! normalized vectors in the same space as the visual encoder.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Text encoder ONNX model filename.
pub const TEXT_MODEL_FILENAME: &str = "text_model.onnx";

/// Tokenizer filename.
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// CLIP context length.
const MAX_LENGTH: usize = 77;

/// CLIP end-of-text token, also used for padding.
const END_OF_TEXT: &str = "<|endoftext|>";

const OUTPUT_NAMES: [&str; 2] = ["text_embeds", "pooler_output"];

fn model_error(message: String) -> PipelineError {
    PipelineError::Model { message }
}

/// CLIP text encoder wrapper.
pub struct TextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    pad_id: i64,
    /// Whether the exported graph takes an `attention_mask` input
    wants_attention_mask: bool,
}

impl TextEncoder {
    /// Load the text encoder from the model directory.
    ///
    /// Expects `text_model.onnx` and `tokenizer.json` in `model_dir`.
    pub fn new(model_dir: &Path) -> Result<Self, PipelineError> {
        let text_model_path = model_dir.join(TEXT_MODEL_FILENAME);
        let tokenizer_path = model_dir.join(TOKENIZER_FILENAME);

        for required in [&text_model_path, &tokenizer_path] {
            if !required.exists() {
                return Err(model_error(format!(
                    "{:?} not found. Run `runway models download` first.",
                    required
                )));
            }
        }

        let session = Session::builder()
            .map_err(|e| model_error(format!("Failed to create ONNX session builder: {e}")))?
            .commit_from_file(&text_model_path)
            .map_err(|e| model_error(format!("Failed to load text encoder model: {e}")))?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| model_error(format!("Failed to load tokenizer: {e}")))?;

        let pad_id = tokenizer.token_to_id(END_OF_TEXT).unwrap_or(0) as i64;
        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded text encoder (inputs: {:?}, outputs: {:?})",
            session.inputs().iter().map(|i| i.name()).collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            pad_id,
            wants_attention_mask,
        })
    }

    /// Encode a batch of texts to normalized embeddings, one per input.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| model_error(format!("Tokenization failed: {e}")))?;

        let mut input_ids = vec![self.pad_id; batch_size * MAX_LENGTH];
        let mut attention_mask = vec![0i64; batch_size * MAX_LENGTH];
        for (i, encoding) in encodings.iter().enumerate() {
            for (j, &id) in encoding.get_ids().iter().take(MAX_LENGTH).enumerate() {
                input_ids[i * MAX_LENGTH + j] = id as i64;
                attention_mask[i * MAX_LENGTH + j] = 1;
            }
        }

        let shape = vec![batch_size as i64, MAX_LENGTH as i64];
        let ids_value = Value::from_array((shape.clone(), input_ids))
            .map_err(|e| model_error(format!("Failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| model_error(format!("Text encoder lock poisoned: {e}")))?;

        let outputs = if self.wants_attention_mask {
            let mask_value = Value::from_array((shape, attention_mask))
                .map_err(|e| model_error(format!("Failed to create mask tensor: {e}")))?;
            session.run(ort::inputs![
                "input_ids" => ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => ids_value])
        }
        .map_err(|e| model_error(format!("Text encoder inference failed: {e}")))?;

        let output = OUTPUT_NAMES
            .iter()
            .find_map(|wanted| outputs.iter().find(|(name, _)| name == wanted))
            .ok_or_else(|| model_error("Text encoder did not produce text_embeds".to_string()))?;

        let (shape, data) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| model_error(format!("Failed to extract text embeddings: {e}")))?;

        let dim = shape
            .last()
            .map(|&d| d as usize)
            .filter(|&d| d > 0 && data.len() == d * batch_size)
            .ok_or_else(|| {
                model_error(format!(
                    "Unexpected text embedding shape {:?} for {} inputs",
                    shape, batch_size
                ))
            })?;

        Ok(crate::math::normalized_rows(data, dim))
    }

    /// Check whether the text encoder model files exist.
    pub fn model_exists(model_dir: &Path) -> bool {
        model_dir.join(TEXT_MODEL_FILENAME).exists() && model_dir.join(TOKENIZER_FILENAME).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextEncoder::new(dir.path()).err().unwrap();
        assert!(err.to_string().contains(TEXT_MODEL_FILENAME));
        assert!(!TextEncoder::model_exists(dir.path()));
    }
}
