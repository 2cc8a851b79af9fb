//! Thresholded, memoized image tagging.
//!
//! On a cache miss the tagger asks the oracle for one score per vocabulary
//! label, keeps every label scoring strictly above the threshold, and caches
//! the result by image path. Failures are returned as typed errors and are
//! never cached, so a later scan retries them. Whether a failure degrades to
//! an untagged image is the caller's decision.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::{LabelMode, TaggingConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::types::Label;

use super::cache::FeatureCache;
use super::oracle::SimilarityOracle;
use super::vocabulary::Vocabulary;

/// Tags images by scoring them against a vocabulary.
pub struct FeatureTagger {
    oracle: Arc<dyn SimilarityOracle>,
    cache: FeatureCache,
    threshold: f32,
    label_mode: LabelMode,
}

impl FeatureTagger {
    /// Create a tagger with an empty cache configured from `config`.
    pub fn new(oracle: Arc<dyn SimilarityOracle>, config: &TaggingConfig) -> Self {
        Self::with_cache(oracle, FeatureCache::from_mode(config.invalidation), config)
    }

    /// Create a tagger around an existing cache.
    pub fn with_cache(
        oracle: Arc<dyn SimilarityOracle>,
        cache: FeatureCache,
        config: &TaggingConfig,
    ) -> Self {
        Self {
            oracle,
            cache,
            threshold: config.threshold,
            label_mode: config.label_mode,
        }
    }

    /// Matched labels for `path`, scoring it only if it is not cached.
    pub fn try_tag(&self, path: &Path, vocabulary: &Vocabulary) -> PipelineResult<Vec<Label>> {
        if let Some(labels) = self.cache.get(path) {
            tracing::trace!("Feature cache hit: {:?}", path);
            return Ok(labels);
        }

        let scores = self.oracle.score(path, vocabulary.labels())?;
        if scores.len() != vocabulary.len() {
            return Err(PipelineError::ScoreMismatch {
                path: path.to_path_buf(),
                scores: scores.len(),
                labels: vocabulary.len(),
            });
        }

        let labels = select_labels(
            vocabulary.labels(),
            &scores,
            self.threshold,
            self.label_mode,
        );
        tracing::debug!("Tagged {:?}: {} labels", path, labels.len());

        self.cache.insert(path, labels.clone());
        Ok(labels)
    }

    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }
}

/// Keep the labels whose score is strictly greater than `threshold`.
///
/// `labels` and `scores` are matched by position. With
/// [`LabelMode::FirstWord`] each match is cut to its first word and repeats
/// are dropped, keeping first-seen order.
pub fn select_labels(
    labels: &[Label],
    scores: &[f32],
    threshold: f32,
    mode: LabelMode,
) -> Vec<Label> {
    let matched = labels
        .iter()
        .zip(scores)
        .filter(|(_, score)| **score > threshold)
        .map(|(label, _)| label.as_str());

    match mode {
        LabelMode::Full => matched.map(str::to_string).collect(),
        LabelMode::FirstWord => {
            let mut seen = HashSet::new();
            matched
                .filter_map(|label| label.split_whitespace().next())
                .filter(|word| seen.insert(*word))
                .map(str::to_string)
                .collect()
        }
    }
}
