//! Runway Core - tagging and filtering of runway look photographs.
//!
//! Photographs are organised one directory per show. Every image found is
//! scored against a fixed fashion vocabulary, and the labels that clear the
//! threshold make it filterable alongside its designer, season, year and show.
//!
//! # Architecture
//!
//! ```text
//! Taxonomy → Vocabulary ─┐
//!                        ├→ FeatureTagger (cached) ─┐
//! Show dirs → Scanner ───┘                          ├→ Vec<ImageRecord> → filter → HTML / JSON
//!                          ThumbnailCodec ──────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use runway_core::{CatalogDimensions, CatalogScanner, ClipOracle, Config, FilterCriteria};
//!
//! let config = Config::load()?;
//! let oracle = Arc::new(ClipOracle::load(&config)?);
//! let scanner = CatalogScanner::from_config(&config, oracle);
//!
//! let catalog = scanner.scan(&config.image_root(), &CatalogDimensions::from(&config.catalog))?;
//! let criteria = FilterCriteria::from_pairs([("designer", "YSL"), ("feature", "dress")]);
//! for record in runway_core::filter(&catalog, &criteria) {
//!     println!("{}: {:?}", record.file_name, record.labels);
//! }
//! ```

// Links Accelerate for ndarray's BLAS-backed dot on macOS.
#[cfg(target_os = "macos")]
extern crate blas_src;

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod math;
pub mod output;
pub mod render;
pub mod tagging;
pub mod types;

pub use catalog::{
    filter, CatalogDimensions, CatalogScanner, FilterCriteria, JpegThumbnailer, ScanReport,
    ThumbnailCodec,
};
pub use config::{Config, FailurePolicy, InvalidationMode, LabelMode};
pub use embedding::EmbeddingEngine;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, RunwayError};
pub use output::{OutputFormat, OutputWriter};
pub use tagging::{
    build_vocabulary, AttributeTaxonomy, ClipOracle, FeatureCache, FeatureTagger,
    SimilarityOracle, Vocabulary,
};
pub use types::{ImageRecord, Label, ShowKey};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_config_builds_full_vocabulary() {
        assert_eq!(Config::default().vocabulary().len(), 141);
    }
}
