use std::borrow::Cow;
use std::sync::Arc;

use super::frame::is_visible;
use crate::scene::{Category, IdSet, SceneDocument, StructuralIndex};
use crate::state::{AuxModuleFlags, CanonicalFilters};

/// Ids displayable for one frame and filter combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet {
    /// Frame the set was computed for; `None` when unfiltered.
    pub frame_used: Option<i64>,
    /// Visible anchor points.
    pub points: IdSet,
    /// Visible connectors.
    pub lines: IdSet,
    /// Visible auxiliary markers.
    pub aux: IdSet,
    /// Decorations copied from the filters.
    pub aux_modules: AuxModuleFlags,
}

impl VisibleSet {
    /// Visible ids of `category`.
    #[must_use]
    pub fn get(&self, category: Category) -> &IdSet {
        match category {
            Category::Points => &self.points,
            Category::Lines => &self.lines,
            Category::Aux => &self.aux,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut IdSet {
        match category {
            Category::Points => &mut self.points,
            Category::Lines => &mut self.lines,
            Category::Aux => &mut self.aux,
        }
    }

    /// Whether `id` is visible in any category.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.category_of(id).is_some()
    }

    /// Category whose visible set holds `id`, checked points first.
    #[must_use]
    pub fn category_of(&self, id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.get(*category).contains(id))
    }

    /// Total visible ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len() + self.aux.len()
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the visible-set calculation reads.
#[derive(Debug, Clone, Copy)]
pub struct VisibleSetInput<'a> {
    /// Canonical filters.
    pub filters: &'a CanonicalFilters,
    /// Canonical active frame.
    pub active_frame: Option<i64>,
    /// Prebuilt index for `document`, if one is available.
    pub index: Option<&'a StructuralIndex>,
    /// Live scene document.
    pub document: &'a Arc<SceneDocument>,
}

/// Compute the visible set.
///
/// With an index, candidates come from the frame buckets and every one is
/// re-checked against the element's own flag and full restriction. Without
/// one, an index is built for this call and the same routine runs.
#[must_use]
pub fn compute_visible_set(input: &VisibleSetInput<'_>) -> VisibleSet {
    if let Some(index) = input.index {
        return from_index(index, input.filters, input.active_frame);
    }
    log::trace!("visible set: no structural index, building one");
    let index = StructuralIndex::build_without_unions(Arc::clone(input.document));
    from_index(&index, input.filters, input.active_frame)
}

fn from_index(
    index: &StructuralIndex,
    filters: &CanonicalFilters,
    frame: Option<i64>,
) -> VisibleSet {
    let mut visible = VisibleSet {
        frame_used: frame,
        aux_modules: filters.aux_modules,
        ..VisibleSet::default()
    };
    for category in Category::ALL {
        if filters.allows(category) {
            *visible.get_mut(category) = visible_in(index, category, frame);
        }
    }
    visible
}

fn visible_in(
    index: &StructuralIndex,
    category: Category,
    frame: Option<i64>,
) -> IdSet {
    let buckets = index.category(category);
    let restricted: Cow<'_, IdSet> = match frame {
        Some(f) => buckets.at_frame(f).map_or_else(Cow::default, Cow::Borrowed),
        None => buckets.all_frame_restricted(),
    };
    restricted
        .iter()
        .chain(buckets.unrestricted())
        .filter(|id| {
            index.resolve(id).is_some_and(|(found, element)| {
                found == category && is_visible(element, frame)
            })
        })
        .cloned()
        .collect()
}
