//! Micro focus state: one focused element plus a bounded list of related
//! ones.
//!
//! [`normalize_micro`] never fails. Whatever shape the raw state has, the
//! result satisfies the micro invariants: a focus only while in micro mode,
//! the focus resolvable and visible, and a related list without duplicates,
//! without the focus and no longer than the cap.

pub mod compute;

pub use compute::{complete_geometry, MicroCompute, StructuralMicro};
use glam::Vec3;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::scene::{Category, StructuralIndex};
use crate::selection::Selection;
use crate::state::Mode;
use crate::visibility::VisibleSet;

/// Default cap on related ids.
pub const DEFAULT_MAX_RELATED: usize = 256;

/// Box around the focused element used to frame the micro view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalBounds {
    /// Box center.
    pub center: Vec3,
    /// Box extent along each axis.
    pub size: Vec3,
}

/// Micro focus state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MicroState {
    /// Focused element.
    pub focus_id: Option<String>,
    /// Elements shown alongside the focus.
    pub related_ids: Vec<String>,
    /// Category of the focused element.
    pub category: Option<Category>,
    /// View box around the focus.
    pub local_bounds: Option<LocalBounds>,
    /// World position of the focus.
    pub focus_position: Option<Vec3>,
}

impl MicroState {
    /// State focused on `id` with no related elements.
    pub fn focused(id: impl Into<String>) -> Self {
        Self {
            focus_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Replace the related list.
    #[must_use]
    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_ids = related.into_iter().map(Into::into).collect();
        self
    }

    /// Focused id.
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus_id.as_deref()
    }
}

/// Inputs for [`normalize_micro`].
#[derive(Debug, Clone, Copy)]
pub struct MicroContext<'a> {
    /// Mode in effect.
    pub mode: Mode,
    /// Canonical selection; supplies the focus when the raw state has none.
    pub selection: Option<&'a Selection>,
    /// Index used to resolve ids.
    pub index: Option<&'a StructuralIndex>,
    /// Visible set ids must belong to, when given.
    pub visible: Option<&'a VisibleSet>,
    /// Cap on related ids.
    pub max_related: usize,
}

impl<'a> MicroContext<'a> {
    /// Context for `mode` with nothing else attached.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            selection: None,
            index: None,
            visible: None,
            max_related: DEFAULT_MAX_RELATED,
        }
    }

    /// Attach a selection.
    #[must_use]
    pub const fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Attach an index.
    #[must_use]
    pub const fn with_index(mut self, index: &'a StructuralIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Attach a visible set.
    #[must_use]
    pub const fn with_visible(mut self, visible: &'a VisibleSet) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Override the related cap.
    #[must_use]
    pub const fn with_max_related(mut self, max_related: usize) -> Self {
        self.max_related = max_related;
        self
    }

    /// Category of `id` if it resolves and, when a visible set is attached,
    /// is visible. Visible-set membership is consulted first.
    fn visible_category(&self, id: &str) -> Option<Category> {
        let index = self.index?;
        match self.visible {
            Some(visible) => visible.category_of(id),
            None => index.category_of(id),
        }
        .filter(|_| index.contains(id))
    }
}

/// Normalize a raw micro state against the current scene.
///
/// Outside micro mode, or when the focus does not resolve to a visible
/// element, focus and related ids are cleared and the other fields of
/// `raw` pass through.
#[must_use]
pub fn normalize_micro(
    raw: Option<&MicroState>,
    ctx: &MicroContext<'_>,
) -> MicroState {
    let raw = raw.cloned().unwrap_or_default();
    if ctx.mode != Mode::Micro {
        return cleared(raw);
    }

    let focus = trimmed(raw.focus_id.as_deref())
        .or_else(|| trimmed(ctx.selection.and_then(Selection::id)));
    let Some((focus, category)) =
        focus.and_then(|id| ctx.visible_category(id).map(|c| (id, c)))
    else {
        return cleared(raw);
    };

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let _ = seen.insert(focus);
    let mut related = Vec::with_capacity(raw.related_ids.len().min(ctx.max_related));
    for id in &raw.related_ids {
        if related.len() >= ctx.max_related {
            break;
        }
        let Some(id) = trimmed(Some(id)) else {
            continue;
        };
        if !seen.insert(id) || ctx.visible_category(id).is_none() {
            continue;
        }
        related.push(id.to_owned());
    }

    let same_focus = raw.focus() == Some(focus);
    MicroState {
        focus_id: Some(focus.to_owned()),
        related_ids: related,
        category: Some(category),
        local_bounds: raw.local_bounds.filter(|_| same_focus),
        focus_position: raw.focus_position.filter(|_| same_focus),
    }
}

/// Drop focus and related ids, keeping every other field of `raw`.
fn cleared(raw: MicroState) -> MicroState {
    MicroState {
        focus_id: None,
        related_ids: Vec::new(),
        ..raw
    }
}

fn trimmed(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::Rng;

    use super::*;
    use crate::scene::{SceneDocument, SceneElement};
    use crate::state::CanonicalFilters;
    use crate::visibility::{compute_visible_set, VisibleSetInput};

    fn index(points: usize) -> StructuralIndex {
        let mut elements: Vec<SceneElement> = (0..points)
            .map(|i| SceneElement::new(format!("P{i}")))
            .collect();
        elements.push(SceneElement::new("H").hidden());
        StructuralIndex::build(Arc::new(SceneDocument::new(
            elements,
            vec![SceneElement::new("L1")],
            vec![],
        )))
    }

    fn visible(index: &StructuralIndex) -> VisibleSet {
        compute_visible_set(&VisibleSetInput {
            filters: &CanonicalFilters::default(),
            active_frame: None,
            index: Some(index),
            document: index.document(),
        })
    }

    #[test]
    fn non_micro_mode_clears_focus_and_related() {
        let index = index(3);
        let raw = MicroState::focused("P0").with_related(["P1", "P2"]);
        for mode in [Mode::Macro, Mode::Meso] {
            let ctx = MicroContext::new(mode).with_index(&index);
            for input in [None, Some(&raw), Some(&MicroState::default())] {
                let out = normalize_micro(input, &ctx);
                assert_eq!(out.focus_id, None);
                assert!(out.related_ids.is_empty());
            }
        }
    }

    #[test]
    fn focus_falls_back_to_selection() {
        let index = index(3);
        let selection = Selection::of("P2");
        let ctx = MicroContext::new(Mode::Micro)
            .with_index(&index)
            .with_selection(&selection);
        let out = normalize_micro(None, &ctx);
        assert_eq!(out.focus(), Some("P2"));
        assert_eq!(out.category, Some(Category::Points));

        let blank = MicroState::focused("  ");
        assert_eq!(normalize_micro(Some(&blank), &ctx).focus(), Some("P2"));
    }

    #[test]
    fn unresolvable_or_hidden_focus_resets() {
        let index = index(3);
        let visible = visible(&index);
        let ctx = MicroContext::new(Mode::Micro)
            .with_index(&index)
            .with_visible(&visible);
        assert_eq!(
            normalize_micro(Some(&MicroState::focused("ghost")), &ctx),
            MicroState::default()
        );
        assert_eq!(
            normalize_micro(Some(&MicroState::focused("H")), &ctx),
            MicroState::default()
        );
        let no_index = MicroContext::new(Mode::Micro);
        assert_eq!(
            normalize_micro(Some(&MicroState::focused("P0")), &no_index),
            MicroState::default()
        );
    }

    #[test]
    fn reset_keeps_the_rest_of_the_raw_state() {
        let index = index(3);
        let visible = visible(&index);
        let bounds = LocalBounds {
            center: Vec3::ONE,
            size: Vec3::splat(2.0),
        };
        let raw = MicroState {
            category: Some(Category::Points),
            local_bounds: Some(bounds),
            focus_position: Some(Vec3::ONE),
            ..MicroState::focused("ghost").with_related(["P1"])
        };
        let expected = MicroState {
            focus_id: None,
            related_ids: Vec::new(),
            ..raw.clone()
        };

        let micro = MicroContext::new(Mode::Micro)
            .with_index(&index)
            .with_visible(&visible);
        assert_eq!(normalize_micro(Some(&raw), &micro), expected);
        let hidden = MicroState {
            focus_id: Some("H".to_owned()),
            ..raw.clone()
        };
        assert_eq!(normalize_micro(Some(&hidden), &micro), expected);

        let macro_ctx = MicroContext::new(Mode::Macro).with_index(&index);
        assert_eq!(normalize_micro(Some(&raw), &macro_ctx), expected);
    }

    #[test]
    fn related_skips_focus_duplicates_and_unknown_ids() {
        let index = index(4);
        let visible = visible(&index);
        let ctx = MicroContext::new(Mode::Micro)
            .with_index(&index)
            .with_visible(&visible);
        let raw = MicroState::focused("P0").with_related([
            "P1", "P0", "", "P1", "ghost", "H", " P2 ", "L1",
        ]);
        let out = normalize_micro(Some(&raw), &ctx);
        assert_eq!(out.related_ids, ["P1", "P2", "L1"]);
    }

    #[test]
    fn related_is_capped() {
        let index = index(10);
        let raw = MicroState::focused("P0")
            .with_related((1..10).map(|i| format!("P{i}")));
        let ctx = MicroContext::new(Mode::Micro)
            .with_index(&index)
            .with_max_related(3);
        let out = normalize_micro(Some(&raw), &ctx);
        assert_eq!(out.related_ids, ["P1", "P2", "P3"]);

        let none = ctx.with_max_related(0);
        assert!(normalize_micro(Some(&raw), &none).related_ids.is_empty());
    }

    #[test]
    fn random_related_lists_respect_invariants() {
        let index = index(500);
        let visible = visible(&index);
        let mut rng = rand::rng();
        for _ in 0..20 {
            let focus = format!("P{}", rng.random_range(0..500));
            let related: Vec<String> = (0..10_000)
                .map(|_| match rng.random_range(0..10) {
                    0 => "ghost".to_owned(),
                    1 => focus.clone(),
                    _ => format!("P{}", rng.random_range(0..500)),
                })
                .collect();
            let raw = MicroState::focused(focus.clone()).with_related(related);
            let ctx = MicroContext::new(Mode::Micro)
                .with_index(&index)
                .with_visible(&visible);
            let out = normalize_micro(Some(&raw), &ctx);

            assert_eq!(out.focus(), Some(focus.as_str()));
            assert!(out.related_ids.len() <= DEFAULT_MAX_RELATED);
            assert!(!out.related_ids.contains(&focus));
            let unique: FxHashSet<&String> = out.related_ids.iter().collect();
            assert_eq!(unique.len(), out.related_ids.len());
        }
    }

    #[test]
    fn geometry_is_kept_only_for_the_same_focus() {
        let index = index(2);
        let ctx = MicroContext::new(Mode::Micro).with_index(&index);
        let raw = MicroState {
            focus_position: Some(Vec3::ONE),
            ..MicroState::focused("P0")
        };
        assert_eq!(
            normalize_micro(Some(&raw), &ctx).focus_position,
            Some(Vec3::ONE)
        );
    }
}
