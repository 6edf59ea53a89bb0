//! Selected element and its normalization against the live scene.

use serde::{Deserialize, Serialize};

use crate::scene::{Category, StructuralIndex};
use crate::visibility::VisibleSet;

/// The selected element, if any.
///
/// After a recompute pass `category` is always the index-resolved category
/// of `id`, and both are `None` together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Selected element id.
    pub id: Option<String>,
    /// Category of the selected element.
    pub category: Option<Category>,
}

impl Selection {
    /// Nothing selected.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            id: None,
            category: None,
        }
    }

    /// Raw selection of `id`; the category is filled in by normalization.
    pub fn of(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            category: None,
        }
    }

    /// Selected id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }
}

/// Canonical selection for `raw`, or `None` when it cannot stand.
///
/// The id is trimmed and must resolve through `index`; without an index
/// nothing resolves. When `visible` is given the id must also be in the
/// visible set of its resolved category.
#[must_use]
pub fn normalize_selection(
    raw: &Selection,
    index: Option<&StructuralIndex>,
    visible: Option<&VisibleSet>,
) -> Option<Selection> {
    let id = raw.id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
    let category = index?.category_of(id)?;
    if visible.is_some_and(|visible| !visible.get(category).contains(id)) {
        return None;
    }
    Some(Selection {
        id: Some(id.to_owned()),
        category: Some(category),
    })
}
