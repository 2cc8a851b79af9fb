//! Configuration management for runway.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field, so an empty or partial file is valid.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::tagging::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for runway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Enumerated designers, seasons, years and shows
    pub catalog: CatalogConfig,

    /// Attribute taxonomy for the label vocabulary
    pub taxonomy: TaxonomyConfig,

    /// Tagging settings
    pub tagging: TaggingConfig,

    /// Embedding model settings
    pub embedding: EmbeddingConfig,

    /// Thumbnail generation settings
    pub thumbnail: ThumbnailConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.runway.runway/config.toml
    /// - Linux: ~/.config/runway/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\runway\config\config.toml
    ///
    /// Falls back to ~/.runway/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "runway", "runway")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".runway").join("config.toml")
            })
    }

    /// Get the resolved image root (with ~ expansion).
    pub fn image_root(&self) -> PathBuf {
        expand(&self.general.image_root)
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        expand(&self.general.model_dir)
    }

    /// Directory holding the files of the configured embedding model.
    pub fn embedding_model_dir(&self) -> PathBuf {
        self.model_dir().join(&self.embedding.model)
    }

    /// Directory for persisted label embeddings.
    ///
    /// Co-located with the models directory: if `model_dir` is `~/.runway/models`,
    /// label banks land at `~/.runway/label_banks`.
    pub fn label_bank_dir(&self) -> PathBuf {
        let model_dir = self.model_dir();
        model_dir.parent().unwrap_or(&model_dir).join("label_banks")
    }

    /// Build the label vocabulary from the configured taxonomy.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::build(&self.taxonomy.categories)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tagging.threshold, 20.0);
        assert_eq!(config.catalog.designers.len(), 8);
        assert_eq!(config.catalog.supported_formats, vec!["png", "jpg", "jpeg"]);
        assert_eq!(config.thumbnail.size, 400);
        assert_eq!(config.thumbnail.quality, 95);
    }

    #[test]
    fn test_default_vocabulary() {
        assert_eq!(Config::default().vocabulary().len(), 141);
    }

    #[test]
    fn test_config_to_toml_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[[taxonomy.categories]]"));

        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.taxonomy, config.taxonomy);
        assert_eq!(parsed.catalog, config.catalog);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [catalog]
            designers = ["YSL"]

            [tagging]
            label_mode = "first_word"
            invalidation = "modified"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.designers, vec!["YSL"]);
        assert_eq!(config.catalog.seasons.len(), 2);
        assert_eq!(config.tagging.label_mode, LabelMode::FirstWord);
        assert_eq!(config.tagging.invalidation, InvalidationMode::Modified);
        assert_eq!(config.tagging.failure_policy, FailurePolicy::Degrade);
        assert_eq!(config.tagging.threshold, 20.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\naddr = \"0.0.0.0:8080\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_default_model_dir_is_named_after_download_repo() {
        let embedding = Config::default().embedding;
        let repo_name = embedding.repo.rsplit('/').next().unwrap();
        assert_eq!(embedding.model, repo_name);
    }

    #[test]
    fn test_label_bank_dir_next_to_models() {
        let mut config = Config::default();
        config.general.model_dir = PathBuf::from("/opt/runway/models");
        assert_eq!(config.label_bank_dir(), PathBuf::from("/opt/runway/label_banks"));
        assert_eq!(
            config.embedding_model_dir(),
            PathBuf::from("/opt/runway/models/clip-vit-base-patch32")
        );
    }
}
