//! Immutable scene document: three flat element arrays plus the structural
//! index built over them.
//!
//! A document is never edited in place. Reloading replaces it (and its
//! index) wholesale, so readers holding an `Arc<SceneDocument>` always see
//! a self-consistent scene.

mod element;
pub mod index;

use std::path::Path;

pub use element::{Endpoint, FrameRestriction, FrameSpan, SceneElement};
pub use index::{IdSet, StructuralIndex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SceneError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The three element kinds of a scene.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Anchor points.
    Points,
    /// Connectors between anchors or coordinates.
    Lines,
    /// Auxiliary markers.
    Aux,
}

impl Category {
    /// All categories in lookup order.
    pub const ALL: [Self; 3] = [Self::Points, Self::Lines, Self::Aux];

    /// Document key for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Lines => "lines",
            Self::Aux => "aux",
        }
    }

    /// Parse a category name. Singular spellings are accepted.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "points" | "point" => Some(Self::Points),
            "lines" | "line" => Some(Self::Lines),
            "aux" => Some(Self::Aux),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SceneDocument
// ---------------------------------------------------------------------------

/// Frozen scene data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDocument {
    /// Anchor points.
    pub points: Vec<SceneElement>,
    /// Connectors.
    pub lines: Vec<SceneElement>,
    /// Auxiliary markers.
    pub aux: Vec<SceneElement>,
}

impl SceneDocument {
    /// Build a document from already-typed element arrays.
    #[must_use]
    pub fn new(
        points: Vec<SceneElement>,
        lines: Vec<SceneElement>,
        aux: Vec<SceneElement>,
    ) -> Self {
        Self { points, lines, aux }
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build a document from parsed JSON.
    ///
    /// The root must be an object. Missing or non-array category keys yield
    /// empty categories; elements without a usable id are skipped.
    pub fn from_value(value: &Value) -> Result<Self, SceneError> {
        let root = value.as_object().ok_or_else(|| {
            SceneError::DocumentParse("root is not an object".to_owned())
        })?;

        let parse_category = |category: Category| -> Vec<SceneElement> {
            let Some(items) =
                root.get(category.as_str()).and_then(Value::as_array)
            else {
                return Vec::new();
            };
            let elements: Vec<SceneElement> =
                items.iter().filter_map(SceneElement::from_json).collect();
            let skipped = items.len() - elements.len();
            if skipped > 0 {
                log::debug!(
                    "{category}: skipped {skipped} element(s) without an id"
                );
            }
            elements
        };

        let doc = Self {
            points: parse_category(Category::Points),
            lines: parse_category(Category::Lines),
            aux: parse_category(Category::Aux),
        };
        log::debug!(
            "scene document: {} points, {} lines, {} aux",
            doc.points.len(),
            doc.lines.len(),
            doc.aux.len()
        );
        Ok(doc)
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Element array for `category`.
    #[must_use]
    pub fn elements(&self, category: Category) -> &[SceneElement] {
        match category {
            Category::Points => &self.points,
            Category::Lines => &self.lines,
            Category::Aux => &self.aux,
        }
    }

    /// Every element tagged with its category, in points, lines, aux
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &SceneElement)> {
        Category::ALL.into_iter().flat_map(move |category| {
            self.elements(category).iter().map(move |el| (category, el))
        })
    }

    /// Total element count across categories.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.points.len() + self.lines.len() + self.aux.len()
    }

    /// Whether the document holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_categories() {
        let doc = SceneDocument::from_json_str(
            r#"{
                "points": [{ "id": "P1", "frames": [0, 1] }, { "id": "P2" }],
                "lines": [{ "uuid": "L1", "end_a": "P1", "end_b": "P2" }],
                "aux": [{ "meta": { "uuid": "A1" } }, { "name": "no id" }]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.points.len(), 2);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.aux.len(), 1);
        assert_eq!(doc.element_count(), 4);

        let order: Vec<_> = doc.iter().map(|(c, el)| (c, el.id.as_str())).collect();
        assert_eq!(order[0], (Category::Points, "P1"));
        assert_eq!(order[3], (Category::Aux, "A1"));
    }

    #[test]
    fn missing_categories_are_empty() {
        let doc = SceneDocument::from_json_str(r#"{ "points": "nope" }"#)
            .unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(
            SceneDocument::from_json_str("[1, 2]"),
            Err(SceneError::DocumentParse(_))
        ));
        assert!(matches!(
            SceneDocument::from_json_str("{ not json"),
            Err(SceneError::DocumentParse(_))
        ));
    }

    #[test]
    fn category_names() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("point"), Some(Category::Points));
        assert_eq!(Category::parse("grid"), None);
    }
}
