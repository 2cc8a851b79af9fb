//! The `runway models` command for fetching the CLIP encoders.
//!
//! All three files land in `<model_dir>/<embedding.model>/`, the directory
//! `ClipOracle::load` reads from.

use std::path::Path;

use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use runway_core::embedding::{file_checksum, VISUAL_MODEL_FILENAME};
use runway_core::tagging::text_encoder::{TEXT_MODEL_FILENAME, TOKENIZER_FILENAME};
use runway_core::Config;

#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download the visual encoder, text encoder and tokenizer
    Download {
        /// Re-download files that are already present
        #[arg(long)]
        force: bool,
    },

    /// Show which model files are installed
    List,

    /// Print the directory the configured model is read from
    Path,
}

/// One file fetched from the model repository.
struct ModelFile {
    label: &'static str,
    remote_path: &'static str,
    local_name: &'static str,
}

const MODEL_FILES: &[ModelFile] = &[
    ModelFile {
        label: "Visual encoder",
        remote_path: "onnx/vision_model.onnx",
        local_name: VISUAL_MODEL_FILENAME,
    },
    ModelFile {
        label: "Text encoder",
        remote_path: "onnx/text_model.onnx",
        local_name: TEXT_MODEL_FILENAME,
    },
    ModelFile {
        label: "Tokenizer",
        remote_path: "tokenizer.json",
        local_name: TOKENIZER_FILENAME,
    },
];

pub async fn execute(args: ModelsArgs, config: &Config) -> anyhow::Result<()> {
    let model_dir = config.embedding_model_dir();

    match args.command {
        ModelsCommand::Download { force } => {
            std::fs::create_dir_all(&model_dir)?;
            let client = reqwest::Client::new();

            for file in MODEL_FILES {
                let dest = model_dir.join(file.local_name);
                if dest.exists() && !force {
                    tracing::info!("{} already present at {:?}", file.label, dest);
                    continue;
                }

                let url = resolve_url(&config.embedding.repo, file.remote_path);
                tracing::info!("Downloading {}...", file.label);
                tracing::info!("  Source: {}", url);
                tracing::info!("  Destination: {:?}", dest);

                download_file(&client, &url, &dest).await?;

                let expected = config.embedding.checksums.get(file.local_name);
                let digest = verify_checksum(&dest, expected.map(String::as_str))?;
                tracing::info!("  {} complete (blake3 {})", file.label, digest);
            }

            tracing::info!("Model files ready in {:?}", model_dir);
        }

        ModelsCommand::List => {
            println!("Model: {} ({})", config.embedding.model, config.embedding.repo);
            println!("  Directory: {}\n", model_dir.display());
            for file in MODEL_FILES {
                let path = model_dir.join(file.local_name);
                let status = match std::fs::metadata(&path) {
                    Ok(meta) => format!("ready ({:.1} MB)", meta.len() as f64 / (1024.0 * 1024.0)),
                    Err(_) => "not installed".to_string(),
                };
                println!("  - {:18} {}", file.local_name, status);
            }
            if !MODEL_FILES
                .iter()
                .all(|f| model_dir.join(f.local_name).exists())
            {
                println!("\nRun `runway models download` to fetch missing files.");
            }
        }

        ModelsCommand::Path => println!("{}", model_dir.display()),
    }

    Ok(())
}

fn resolve_url(repo: &str, remote_path: &str) -> String {
    format!("https://huggingface.co/{repo}/resolve/main/{remote_path}")
}

/// Stream `url` to `dest` with a byte progress bar.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let pb = match response.content_length() {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;
    pb.finish_and_clear();

    Ok(())
}

/// Hash `path` and compare against `expected` when one is configured.
///
/// A mismatching file is removed so the next run downloads it again.
fn verify_checksum(path: &Path, expected: Option<&str>) -> anyhow::Result<String> {
    let actual = file_checksum(path)
        .map_err(|e| anyhow::anyhow!("Checksum computation failed for {}: {e}", path.display()))?;

    if let Some(expected) = expected {
        if !actual.eq_ignore_ascii_case(expected) {
            let _ = std::fs::remove_file(path);
            anyhow::bail!(
                "Checksum mismatch for {}:\n  expected: {}\n  actual:   {}\n\
                 Corrupt file removed, try downloading again.",
                path.display(),
                expected,
                actual
            );
        }
        tracing::debug!("  Checksum verified");
    }

    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_points_at_main_branch() {
        assert_eq!(
            resolve_url("Xenova/clip-vit-base-patch32", "onnx/text_model.onnx"),
            "https://huggingface.co/Xenova/clip-vit-base-patch32/resolve/main/onnx/text_model.onnx"
        );
    }

    #[test]
    fn local_names_match_what_the_oracle_loads() {
        let names: Vec<&str> = MODEL_FILES.iter().map(|f| f.local_name).collect();
        assert_eq!(names, vec!["visual.onnx", "text_model.onnx", "tokenizer.json"]);
    }

    #[test]
    fn verify_checksum_accepts_matching_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, b"{}").unwrap();
        let expected = file_checksum(&path).unwrap();

        let digest = verify_checksum(&path, Some(&expected.to_uppercase())).unwrap();
        assert_eq!(digest, expected);
        assert!(path.exists());
    }

    #[test]
    fn verify_checksum_without_expectation_only_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visual.onnx");
        std::fs::write(&path, b"weights").unwrap();
        assert_eq!(verify_checksum(&path, None).unwrap().len(), 64);
    }

    #[test]
    fn verify_checksum_mismatch_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text_model.onnx");
        std::fs::write(&path, b"weights").unwrap();

        let err = verify_checksum(&path, Some(&"0".repeat(64))).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
        assert!(!path.exists());
    }
}
