//! Subcommand implementations.

pub mod config;
pub mod models;
pub mod scan;
pub mod serve;
pub mod vocab;

use std::sync::Arc;

use anyhow::Context;
use runway_core::{ClipOracle, Config};

/// Load the CLIP encoders off the async runtime and encode the vocabulary.
pub(crate) async fn load_oracle(config: &Config) -> anyhow::Result<Arc<ClipOracle>> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || -> anyhow::Result<Arc<ClipOracle>> {
        let oracle = ClipOracle::load(&config).context("Failed to load CLIP encoders")?;
        oracle
            .warm(&config.vocabulary())
            .context("Failed to encode label vocabulary")?;
        Ok(Arc::new(oracle))
    })
    .await?
}
