//! Error types for the runway tagging pipeline.
//!
//! Errors are organized by stage so that callers can decide per image whether
//! to log and continue, or stop the scan. Every pipeline error that concerns a
//! single image carries its path.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for runway operations.
#[derive(Error, Debug)]
pub enum RunwayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Model loading or text encoding failed (not tied to one image)
    #[error("Model error: {message}")]
    Model { message: String },

    /// The similarity oracle failed for an image
    #[error("Scoring failed for {path}: {message}")]
    Scoring { path: PathBuf, message: String },

    /// The oracle returned a score vector that does not line up with the labels
    #[error("Score count mismatch for {path}: {scores} scores for {labels} labels")]
    ScoreMismatch {
        path: PathBuf,
        scores: usize,
        labels: usize,
    },

    /// Thumbnail encoding failed
    #[error("Thumbnail failed for {path}: {message}")]
    Thumbnail { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience type alias for runway results.
pub type Result<T> = std::result::Result<T, RunwayError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_mismatch_message() {
        let err = PipelineError::ScoreMismatch {
            path: PathBuf::from("looks/a.jpg"),
            scores: 3,
            labels: 141,
        };
        let msg = err.to_string();
        assert!(msg.contains("looks/a.jpg"));
        assert!(msg.contains("3 scores for 141 labels"));
    }

    #[test]
    fn test_pipeline_error_converts_to_runway_error() {
        let err: RunwayError = PipelineError::FileNotFound(PathBuf::from("x.png")).into();
        assert!(err.to_string().starts_with("Pipeline error:"));
    }
}
