//! Runway CLI - browse runway looks by designer, season, year, show and garment features.
//!
//! Photographs are read from one directory per show under the image root,
//! auto-tagged against a fashion vocabulary, and served as a filterable page.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the CLIP encoders
//! runway models download
//!
//! # Serve the catalog on http://127.0.0.1:5000
//! runway serve --root ./static/images
//!
//! # Dump tagged records
//! runway scan --format jsonl --output looks.jsonl
//!
//! # Print the label vocabulary
//! runway vocab
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Runway - filterable catalog of auto-tagged runway looks.
#[derive(Parser, Debug)]
#[command(name = "runway")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the filterable catalog over HTTP
    Serve(cli::serve::ServeArgs),

    /// Scan the image root once and write tagged records
    Scan(cli::scan::ScanArgs),

    /// Print the label vocabulary built from the taxonomy
    Vocab(cli::vocab::VocabArgs),

    /// Download and inspect the CLIP encoders
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so config problems go straight to stderr.
    let config = match runway_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `runway config path`."
            );
            runway_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Runway v{}", runway_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Vocab(args) => cli::vocab::execute(args, &config),
        Commands::Models(args) => cli::models::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args),
    }
}
