//! Core data types for the runway catalog.
//!
//! An [`ImageRecord`] is one photographed look, found under a show directory
//! and enriched with the labels the tagger matched for it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A descriptive phrase from the tagging vocabulary, e.g. `"red dress"`.
pub type Label = String;

/// The four enumerated attributes that identify one runway show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowKey {
    pub designer: String,
    pub season: String,
    pub year: String,
    pub show: String,
}

impl ShowKey {
    pub fn new(
        designer: impl Into<String>,
        season: impl Into<String>,
        year: impl Into<String>,
        show: impl Into<String>,
    ) -> Self {
        Self {
            designer: designer.into(),
            season: season.into(),
            year: year.into(),
            show: show.into(),
        }
    }

    /// Directory name holding this show's photographs.
    ///
    /// `"{designer} {season} {year} {show}"`, e.g. `"YSL Fall Winter 2025 Paris"`.
    pub fn dir_name(&self) -> String {
        format!(
            "{} {} {} {}",
            self.designer, self.season, self.year, self.show
        )
    }
}

/// One tagged runway photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Path to the source file; unique within a catalog
    pub path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    pub designer: String,
    pub season: String,
    pub year: String,
    pub show: String,

    /// Labels whose similarity score cleared the tagging threshold
    pub labels: Vec<Label>,

    /// Base64-encoded JPEG thumbnail; empty when encoding failed or is disabled
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
}

impl ImageRecord {
    /// Whether every label in `wanted` is present on this record.
    pub fn has_all_labels<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted
            .iter()
            .all(|w| self.labels.iter().any(|l| l == w.as_ref()))
    }
}
