//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::tagging::taxonomy::COMPONENT_CATEGORY;

use super::Config;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let catalog = &self.catalog;
        for (name, values) in [
            ("designers", &catalog.designers),
            ("seasons", &catalog.seasons),
            ("years", &catalog.years),
            ("shows", &catalog.shows),
            ("supported_formats", &catalog.supported_formats),
        ] {
            if values.is_empty() {
                return Err(invalid(format!("catalog.{name} must not be empty")));
            }
        }

        let taxonomy = &self.taxonomy.categories;
        if taxonomy.components().is_empty() {
            return Err(invalid(format!(
                "taxonomy.categories must include a non-empty \"{COMPONENT_CATEGORY}\" category"
            )));
        }
        let mut seen = HashSet::new();
        for category in taxonomy.categories() {
            if !seen.insert(category.name.as_str()) {
                return Err(invalid(format!(
                    "taxonomy.categories has duplicate category \"{}\"",
                    category.name
                )));
            }
        }

        if !self.tagging.threshold.is_finite() {
            return Err(invalid("tagging.threshold must be a finite number"));
        }
        if self.embedding.image_size == 0 {
            return Err(invalid("embedding.image_size must be > 0"));
        }
        let scale = self.embedding.logit_scale;
        if scale.is_nan() || scale <= 0.0 {
            return Err(invalid("embedding.logit_scale must be > 0"));
        }
        if self.thumbnail.size == 0 {
            return Err(invalid("thumbnail.size must be > 0"));
        }
        if !(1..=100).contains(&self.thumbnail.quality) {
            return Err(invalid("thumbnail.quality must be between 1 and 100"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::taxonomy::{AttributeTaxonomy, Category};

    #[test]
    fn test_default_config_passes_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_designers() {
        let mut config = Config::default();
        config.catalog.designers.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("catalog.designers"));
    }

    #[test]
    fn test_validate_rejects_taxonomy_without_components() {
        let mut config = Config::default();
        config.taxonomy.categories = AttributeTaxonomy::new(vec![Category::new("color", &["red"])]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("component"));
    }

    #[test]
    fn test_validate_rejects_duplicate_categories() {
        let mut config = Config::default();
        config.taxonomy.categories = AttributeTaxonomy::new(vec![
            Category::new("component", &["dress"]),
            Category::new("color", &["red"]),
            Category::new("color", &["blue"]),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate category \"color\""));
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let mut config = Config::default();
        config.tagging.threshold = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tagging.threshold"));
    }

    #[test]
    fn test_validate_rejects_bad_thumbnail() {
        let mut config = Config::default();
        config.thumbnail.size = 0;
        assert!(config.validate().unwrap_err().to_string().contains("thumbnail.size"));

        let mut config = Config::default();
        config.thumbnail.quality = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("thumbnail.quality"));
    }

    #[test]
    fn test_validate_rejects_zero_logit_scale() {
        let mut config = Config::default();
        config.embedding.logit_scale = 0.0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("logit_scale"));
    }
}
