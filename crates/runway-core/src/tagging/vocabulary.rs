//! Label vocabulary built from the attribute taxonomy.
//!
//! The vocabulary is the ordered list of phrases the similarity oracle scores
//! an image against. Score `i` belongs to label `i`; nothing reconciles them
//! by name, so the order produced here is part of the contract.

use std::collections::HashMap;

use crate::types::Label;

use super::taxonomy::AttributeTaxonomy;

/// Components that receive explicit length-prefixed labels.
///
/// Jacket, top and shirt never get length variants.
const LENGTH_COMPONENTS: [&str; 2] = ["dress", "skirt"];

/// Lengths used for the explicit labels, in this literal order rather than
/// the taxonomy's own `length` order.
const LENGTHS: [&str; 3] = ["mini", "maxi", "midi"];

/// Expand a taxonomy into its ordered label list.
///
/// For each component `c`: `c` itself, then `"{v} {c}"` for every value `v` of
/// every category other than `component` and `length`. Then
/// `"{length} {component}"` for dress and skirt over mini, maxi, midi.
pub fn build_vocabulary(taxonomy: &AttributeTaxonomy) -> Vec<Label> {
    let mut labels = Vec::new();

    for component in taxonomy.components() {
        labels.push(component.clone());
        for category in taxonomy.modifiers() {
            for value in &category.values {
                labels.push(format!("{value} {component}"));
            }
        }
    }

    for component in LENGTH_COMPONENTS {
        for length in LENGTHS {
            labels.push(format!("{length} {component}"));
        }
    }

    labels
}

/// A built vocabulary ready to be scored against.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    labels: Vec<Label>,
    by_label: HashMap<Label, usize>,
}

impl Vocabulary {
    /// Build the vocabulary for a taxonomy.
    pub fn build(taxonomy: &AttributeTaxonomy) -> Self {
        let vocab = Self::from_labels(build_vocabulary(taxonomy));
        tracing::info!(
            "Built vocabulary: {} labels from {} categories",
            vocab.len(),
            taxonomy.categories().len()
        );
        vocab
    }

    /// Wrap an explicit label list, keeping its order.
    pub fn from_labels(labels: Vec<Label>) -> Self {
        let mut by_label = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            by_label.entry(label.clone()).or_insert(i);
        }
        Self { labels, by_label }
    }

    /// All labels in scoring order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of the first occurrence of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// BLAKE3 hash of all labels in order.
    ///
    /// Keys cached label embeddings; any change of wording or order changes it.
    pub fn content_hash(&self) -> String {
        content_hash(&self.labels)
    }
}

/// BLAKE3 hash of a label list in order.
pub fn content_hash(labels: &[Label]) -> String {
    let mut hasher = blake3::Hasher::new();
    for label in labels {
        hasher.update(label.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
