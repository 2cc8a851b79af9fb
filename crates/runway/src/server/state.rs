use std::path::PathBuf;

use runway_core::{CatalogDimensions, CatalogScanner, Config, ImageRecord, PipelineResult};

/// Shared by every request.
///
/// The catalog itself is not stored: each request rescans `root`, and only
/// the tagger's label cache inside `scanner` carries over.
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
    pub dimensions: CatalogDimensions,
    pub scanner: CatalogScanner,
}

impl AppState {
    pub fn new(config: Config, root: PathBuf, scanner: CatalogScanner) -> Self {
        let dimensions = CatalogDimensions::from(&config.catalog);
        Self {
            config,
            root,
            dimensions,
            scanner,
        }
    }

    /// Blocking; call from `spawn_blocking`.
    pub fn scan(&self) -> PipelineResult<Vec<ImageRecord>> {
        self.scanner.scan(&self.root, &self.dimensions)
    }
}
