//! Fixed set of topic categories a question can be filed under.

use serde::{Deserialize, Serialize};

/// One category: stable key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Ordered category set. The first entry is the initially active category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(Vec<Category>);

impl Default for Categories {
    fn default() -> Self {
        Self(vec![
            Category::new("trainingsprozess", "Trainingsprozess"),
            Category::new("lauftechnik", "Lauftechnik"),
            Category::new("schlagtechnik", "Schlagtechnik"),
            Category::new("taktik", "Taktik"),
            Category::new("athletik", "Athletik"),
        ])
    }
}

impl From<Vec<Category>> for Categories {
    fn from(v: Vec<Category>) -> Self {
        Self(v)
    }
}

impl Categories {
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|c| c.key == key)
    }

    /// Display label for `key`; unknown keys are shown raw.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.as_str())
            .unwrap_or(key)
    }

    pub fn default_key(&self) -> Option<&str> {
        self.0.first().map(|c| c.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
