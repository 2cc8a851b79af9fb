//! ONNX Runtime session for the CLIP visual encoder.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Output names tried in order; CLIP exports call the projected vector `image_embeds`.
const OUTPUT_NAMES: [&str; 2] = ["image_embeds", "pooler_output"];

/// Wraps an ONNX Runtime session for visual embedding.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct VisualSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl VisualSession {
    /// Load a visual encoder from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Model {
                message: format!("Failed to load visual encoder {:?}: {e}", model_path),
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "pixel_values".to_string());

        tracing::debug!(
            "Loaded visual encoder from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run inference on a preprocessed tensor and return the normalized embedding.
    ///
    /// Input shape: \[1, 3, size, size\].
    pub fn embed(&self, preprocessed: &Array4<f32>, path: &Path) -> Result<Vec<f32>, PipelineError> {
        let scoring_error = |message: String| PipelineError::Scoring {
            path: path.to_path_buf(),
            message,
        };

        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();
        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| scoring_error(format!("Failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| scoring_error(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| scoring_error(format!("ONNX inference failed: {e}")))?;

        let output = OUTPUT_NAMES
            .iter()
            .find_map(|wanted| outputs.iter().find(|(name, _)| name == wanted))
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| scoring_error("Visual encoder produced no outputs".to_string()))?;

        let (shape, data) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| scoring_error(format!("Failed to extract embedding tensor: {e}")))?;

        // [1, dim] or [dim]
        let mut raw = match shape.len() {
            1 => data.to_vec(),
            2 => data[..shape[1] as usize].to_vec(),
            _ => {
                return Err(scoring_error(format!(
                    "Unexpected embedding shape: {:?}",
                    shape
                )));
            }
        };

        crate::math::l2_normalize_in_place(&mut raw);
        Ok(raw)
    }
}
