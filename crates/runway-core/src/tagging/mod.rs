//! Label-driven image tagging.
//!
//! The taxonomy expands into an ordered vocabulary, an oracle scores each
//! image against every label, and the tagger keeps the labels above the
//! threshold, memoized per image path.

pub mod cache;
pub mod clip;
pub mod label_bank;
pub mod oracle;
pub mod tagger;
pub mod taxonomy;
pub mod text_encoder;
pub mod vocabulary;

pub use cache::{FeatureCache, InvalidationPolicy, ModifiedTime, NeverInvalidate};
pub use clip::ClipOracle;
pub use oracle::SimilarityOracle;
pub use tagger::{select_labels, FeatureTagger};
pub use taxonomy::{AttributeTaxonomy, Category};
pub use vocabulary::{build_vocabulary, Vocabulary};
