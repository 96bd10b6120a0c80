//! Detection result data model.
//!
//! This module defines the four-category detection result that flows from the
//! page prober, through the delivery channel's message envelope, to the
//! result renderer. It is the wire payload of the `technologies` field in
//! agent replies, so the field names here are the wire format.

use serde::{Deserialize, Serialize};

use crate::config::{LIMITED_DETECTION_PLACEHOLDER, NO_DATA_PLACEHOLDER};

/// One of the four technology categories a signature (and its matches)
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Frontend frameworks and libraries
    Frontend,
    /// Backend frameworks
    Backend,
    /// Analytics and tracking tools
    Analytics,
    /// CMS and e-commerce platforms
    Cms,
}

impl Category {
    /// All categories in evaluation (and rendering) order.
    pub const ALL: [Category; 4] = [
        Category::Frontend,
        Category::Backend,
        Category::Analytics,
        Category::Cms,
    ];

    /// Lowercase identifier used in wire payloads and region labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Analytics => "analytics",
            Category::Cms => "cms",
        }
    }

    /// Human-readable heading for the result panel.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Analytics => "Analytics",
            Category::Cms => "CMS & E-commerce",
        }
    }
}

/// Technologies detected on a page, grouped by category.
///
/// Each field is an ordered sequence of technology names: sequence order is
/// evaluation order, and a name never repeats within its own sequence.
/// A `DetectionResult` is always fully populated; a category with no matches
/// is an empty vector, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Frontend frameworks and libraries
    #[serde(default)]
    pub frontend: Vec<String>,
    /// Backend frameworks
    #[serde(default)]
    pub backend: Vec<String>,
    /// Analytics and tracking tools
    #[serde(default)]
    pub analytics: Vec<String>,
    /// CMS and e-commerce platforms
    #[serde(default)]
    pub cms: Vec<String>,
}

impl DetectionResult {
    /// Creates an empty result with all four sequences present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence for `category`.
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Frontend => &self.frontend,
            Category::Backend => &self.backend,
            Category::Analytics => &self.analytics,
            Category::Cms => &self.cms,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Frontend => &mut self.frontend,
            Category::Backend => &mut self.backend,
            Category::Analytics => &mut self.analytics,
            Category::Cms => &mut self.cms,
        }
    }

    /// Appends `name` to the category's sequence unless it is already present.
    ///
    /// Duplicates are suppressed per category only; different categories may
    /// independently claim the same name.
    pub fn push_unique(&mut self, category: Category, name: impl Into<String>) {
        let name = name.into();
        let entries = self.category_mut(category);
        if !entries.iter().any(|existing| *existing == name) {
            entries.push(name);
        }
    }

    /// True if no category detected anything.
    pub fn is_empty(&self) -> bool {
        Category::ALL
            .iter()
            .all(|category| self.category(*category).is_empty())
    }

    /// The total-failure result: a single diagnostic entry in the frontend
    /// sequence, everything else empty.
    pub fn limited() -> Self {
        Self {
            frontend: vec![LIMITED_DETECTION_PLACEHOLDER.to_string()],
            ..Self::default()
        }
    }

    /// The result substituted when a detection payload fails shape validation.
    pub fn no_data() -> Self {
        Self {
            frontend: vec![NO_DATA_PLACEHOLDER.to_string()],
            ..Self::default()
        }
    }

    /// Coerces an untrusted JSON value into a well-formed result.
    ///
    /// A non-object value yields [`DetectionResult::no_data`]. For an object,
    /// each category field is read independently: a missing or non-array
    /// field becomes an empty sequence, and non-string array entries are
    /// coerced to their JSON string form rather than dropped.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let map = match value.as_object() {
            Some(map) => map,
            None => return Self::no_data(),
        };

        let mut result = Self::new();
        for category in Category::ALL {
            if let Some(entries) = map.get(category.as_str()).and_then(|v| v.as_array()) {
                for entry in entries {
                    let name = match entry.as_str() {
                        Some(s) => s.to_string(),
                        None => entry.to_string(),
                    };
                    result.push_unique(category, name);
                }
            }
        }
        result
    }
}
