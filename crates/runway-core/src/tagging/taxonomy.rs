//! Attribute taxonomy: the categories and values labels are built from.
//!
//! Categories are kept in a `Vec` so that iteration order is declaration
//! order; label positions depend on it.

use serde::{Deserialize, Serialize};

/// Category holding the garment pieces every other attribute is combined with.
pub const COMPONENT_CATEGORY: &str = "component";

/// Category excluded from the general cross product.
pub const LENGTH_CATEGORY: &str = "length";

/// One named category with its ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub values: Vec<String>,
}

impl Category {
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Ordered mapping from category name to values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTaxonomy {
    categories: Vec<Category>,
}

impl AttributeTaxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The runway fashion taxonomy used by default.
    pub fn fashion() -> Self {
        Self::new(vec![
            Category::new(
                COMPONENT_CATEGORY,
                &["dress", "skirt", "top", "shirt", "jacket"],
            ),
            Category::new(
                "color",
                &[
                    "green", "black", "brown", "burgundy", "red", "yellow", "pink", "blue",
                ],
            ),
            Category::new(
                "print",
                &[
                    "animal print",
                    "floral print",
                    "geometric print",
                    "striped print",
                    "camouflage print",
                    "abstract print",
                ],
            ),
            Category::new("style", &["structured", "flowy", "oversized", "ballgown"]),
            Category::new(LENGTH_CATEGORY, &["maxi", "midi", "mini"]),
            Category::new("waistline", &["dropped waistline", "empire waistline"]),
            Category::new(
                "fabric",
                &["leather", "denim", "lace", "fur", "sheer", "metallic"],
            ),
        ])
    }

    /// All categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Values of a category, or `None` if the taxonomy lacks it.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Garment components, empty if the taxonomy has none.
    pub fn components(&self) -> &[String] {
        self.get(COMPONENT_CATEGORY).unwrap_or(&[])
    }

    /// Categories that are combined with every component, in order.
    pub fn modifiers(&self) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(|c| c.name != COMPONENT_CATEGORY && c.name != LENGTH_CATEGORY)
    }
}

impl Default for AttributeTaxonomy {
    fn default() -> Self {
        Self::fashion()
    }
}
