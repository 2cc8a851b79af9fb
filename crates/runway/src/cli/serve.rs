//! The `runway serve` command.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use runway_core::{CatalogScanner, Config};

use crate::server::{self, AppState};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (defaults to `server.addr`)
    #[arg(long)]
    pub addr: Option<SocketAddr>,

    /// Image root (defaults to `general.image_root`)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => config
            .server
            .addr
            .parse()
            .with_context(|| format!("Invalid server.addr '{}'", config.server.addr))?,
    };
    let root = args.root.unwrap_or_else(|| config.image_root());
    tracing::info!("Serving looks from {:?}", root);

    let oracle = super::load_oracle(&config).await?;
    let scanner = CatalogScanner::from_config(&config, oracle);
    let state = Arc::new(AppState::new(config, root, scanner));

    server::serve(addr, state).await
}
