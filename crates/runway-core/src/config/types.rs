//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::tagging::taxonomy::AttributeTaxonomy;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory holding one sub-directory per show
    pub image_root: PathBuf,

    /// Directory where ONNX models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("static/images"),
            model_dir: PathBuf::from("~/.runway/models"),
        }
    }
}

/// The enumerated show attributes and accepted file types.
///
/// Scanning visits every `designer × season × year × show` combination in
/// the order declared here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub designers: Vec<String>,
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub shows: Vec<String>,

    /// Image file extensions picked up by the scanner (case-insensitive)
    pub supported_formats: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            designers: strings(&[
                "YSL",
                "Chanel",
                "Dior",
                "Balenciaga",
                "Louis Vuitton",
                "Hermès",
                "Givenchy",
                "Valentino",
            ]),
            seasons: strings(&["Spring Summer", "Fall Winter"]),
            years: strings(&["2021", "2022", "2023", "2024", "2025"]),
            shows: strings(&["Paris", "New York", "Milan", "London"]),
            supported_formats: strings(&["png", "jpg", "jpeg"]),
        }
    }
}

/// Taxonomy the vocabulary is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub categories: AttributeTaxonomy,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            categories: AttributeTaxonomy::fashion(),
        }
    }
}

/// How matched labels are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// The full phrase, e.g. `"red dress"`
    #[default]
    Full,
    /// Only the first word, de-duplicated, e.g. `"red"`
    FirstWord,
}

/// What a scan does when one image fails to tag or encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the error, keep the record with no labels / no thumbnail
    #[default]
    Degrade,
    /// Abort the scan with the first error
    Propagate,
}

/// When cached labels are thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationMode {
    /// Keep entries for the lifetime of the process
    #[default]
    Never,
    /// Re-tag when the file's modification time changes
    Modified,
}

/// Tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Labels scoring strictly above this value are kept.
    /// Scores are `logit_scale * cosine`, so 20 means a cosine above 0.2
    /// at the default scale.
    pub threshold: f32,

    pub label_mode: LabelMode,

    pub failure_policy: FailurePolicy,

    pub invalidation: InvalidationMode,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            label_mode: LabelMode::Full,
            failure_policy: FailurePolicy::Degrade,
            invalidation: InvalidationMode::Never,
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model name; also the sub-directory of `model_dir` holding its files
    pub model: String,

    /// Hugging Face repository the model files are downloaded from
    pub repo: String,

    /// Square input size of the visual encoder
    pub image_size: u32,

    /// Multiplier applied to cosine similarities
    pub logit_scale: f32,

    /// Persist label embeddings next to the model directory
    pub cache_label_banks: bool,

    /// Expected BLAKE3 digests of downloaded files, keyed by local filename
    pub checksums: BTreeMap<String, String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "clip-vit-base-patch32".to_string(),
            repo: "Xenova/clip-vit-base-patch32".to_string(),
            image_size: 224,
            logit_scale: 100.0,
            cache_label_banks: true,
            checksums: BTreeMap::new(),
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Whether to generate thumbnails
    pub enabled: bool,

    /// Bounding box in pixels; the thumbnail fits inside `size × size`
    pub size: u32,

    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 400,
            quality: 95,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Output settings for `runway scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
