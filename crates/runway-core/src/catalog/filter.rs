//! Multi-attribute filtering of a scanned catalog.
//!
//! Categories combine with AND; within a category any selected value matches.
//! An empty selection places no constraint. Selected labels must all be
//! present on a record.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::types::{ImageRecord, Label};

/// Query keys understood by [`FilterCriteria::from_pairs`].
pub const DESIGNER_KEY: &str = "designer";
pub const SEASON_KEY: &str = "season";
pub const YEAR_KEY: &str = "year";
pub const SHOW_KEY: &str = "show";
pub const FEATURE_KEY: &str = "feature";

/// Selected values per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub designers: Vec<String>,
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub shows: Vec<String>,
    pub features: Vec<Label>,
}

impl FilterCriteria {
    /// Build criteria from repeated `key=value` query pairs.
    ///
    /// Unknown keys and empty values are ignored; repeated values are kept once.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            let target = match key.as_ref() {
                DESIGNER_KEY => &mut criteria.designers,
                SEASON_KEY => &mut criteria.seasons,
                YEAR_KEY => &mut criteria.years,
                SHOW_KEY => &mut criteria.shows,
                FEATURE_KEY => &mut criteria.features,
                _ => continue,
            };
            if !target.contains(&value) {
                target.push(value);
            }
        }
        criteria
    }

    /// Whether no category is constrained.
    pub fn is_empty(&self) -> bool {
        self.designers.is_empty()
            && self.seasons.is_empty()
            && self.years.is_empty()
            && self.shows.is_empty()
            && self.features.is_empty()
    }

    /// Whether `record` satisfies every constrained category.
    pub fn matches(&self, record: &ImageRecord) -> bool {
        selected(&self.designers, &record.designer)
            && selected(&self.seasons, &record.season)
            && selected(&self.years, &record.year)
            && selected(&self.shows, &record.show)
            && record.has_all_labels(&self.features)
    }

    /// The `(key, value)` pairs this criteria was built from, in category order.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        let groups = [
            (DESIGNER_KEY, &self.designers),
            (SEASON_KEY, &self.seasons),
            (YEAR_KEY, &self.years),
            (SHOW_KEY, &self.shows),
            (FEATURE_KEY, &self.features),
        ];
        groups
            .into_iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key, v.as_str())))
            .collect()
    }

    /// Encode the selection as an `application/x-www-form-urlencoded` query.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

fn selected(values: &[String], value: &str) -> bool {
    values.is_empty() || values.iter().any(|v| v == value)
}

/// Records matching `criteria`, in catalog order.
pub fn filter<'a>(catalog: &'a [ImageRecord], criteria: &FilterCriteria) -> Vec<&'a ImageRecord> {
    catalog.iter().filter(|r| criteria.matches(r)).collect()
}
