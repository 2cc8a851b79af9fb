//! The similarity oracle seam.
//!
//! The tagger only needs "one affinity per label, in label order". Anything
//! that can produce that (the ONNX CLIP encoders, a remote service, a test
//! stub) plugs in here.

use std::path::Path;

use crate::error::PipelineResult;
use crate::types::Label;

/// Scores an image against a list of labels.
pub trait SimilarityOracle: Send + Sync {
    /// Return one unnormalized affinity per label, in the order of `labels`.
    fn score(&self, image: &Path, labels: &[Label]) -> PipelineResult<Vec<f32>>;
}

impl<T: SimilarityOracle + ?Sized> SimilarityOracle for std::sync::Arc<T> {
    fn score(&self, image: &Path, labels: &[Label]) -> PipelineResult<Vec<f32>> {
        (**self).score(image, labels)
    }
}
