//! The `runway scan` command: one pass over the image root, records to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use runway_core::{CatalogDimensions, CatalogScanner, Config, OutputFormat, OutputWriter};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image root (defaults to `general.image_root`)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format: json or jsonl (defaults to `output.format`)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip thumbnail encoding
    #[arg(long)]
    pub no_thumbnail: bool,
}

pub async fn execute(args: ScanArgs, mut config: Config) -> anyhow::Result<()> {
    if args.no_thumbnail {
        config.thumbnail.enabled = false;
    }
    let format = match args.format {
        Some(format) => format,
        None => config.output.format.parse().map_err(anyhow::Error::msg)?,
    };
    let root = args.root.unwrap_or_else(|| config.image_root());
    if !root.is_dir() {
        tracing::warn!("Image root {:?} does not exist; the catalog will be empty", root);
    }

    let oracle = super::load_oracle(&config).await?;
    let scanner = CatalogScanner::from_config(&config, oracle);
    let dimensions = CatalogDimensions::from(&config.catalog);

    let (records, report) =
        tokio::task::spawn_blocking(move || scanner.scan_with_report(&root, &dimensions))
            .await??;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = OutputWriter::new(sink, format, config.output.pretty);
    writer.write_catalog(&records)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!(
            "Wrote {} records from {} show directories to {:?}",
            writer.records_written(),
            report.directories,
            path
        );
    }
    Ok(())
}
