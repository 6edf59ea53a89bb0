//! The recompute pass: the only writer of the canonical snapshot.
//!
//! A pass reads the live document, index and UI inputs, derives the
//! visible set, the canonical selection and the micro state, and commits
//! all three together with a status record in one swap. Hooks run after
//! the commit, once each, and may call back into the engine; a nested
//! pass started from a hook returns the snapshot just committed instead
//! of recursing.

use std::cell::Cell;
use std::sync::Arc;

use serde::Serialize;

use super::SceneEngine;
use crate::error::SceneError;
use crate::micro::{
    complete_geometry, normalize_micro, MicroContext, MicroState,
};
use crate::scene::StructuralIndex;
use crate::selection::{normalize_selection, Selection};
use crate::state::mode::activity_block;
use crate::state::{MicroBlock, Mode, RuntimeFlags};
use crate::visibility::{compute_visible_set, VisibleSet, VisibleSetInput};

/// Summary of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecomputeStatus {
    /// Pass number, starting at 1. Zero before the first pass.
    pub sequence: u64,
    /// Mode the caller asked for.
    pub requested_mode: Mode,
    /// Mode actually in effect: micro falls back to macro while blocked.
    pub effective_mode: Mode,
    /// Whether a micro state was produced.
    pub micro_ready: bool,
    /// Why micro mode is not in effect, when it was requested.
    pub blocked_by: Option<MicroBlock>,
    /// Frame the visible set was computed for.
    pub frame: Option<i64>,
    /// Whether playback was running.
    pub playing: bool,
}

/// Canonical result of a pass. Readers always see one whole snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Visible ids per category.
    pub visible: Arc<VisibleSet>,
    /// Canonical selection.
    pub selection: Selection,
    /// Micro state; `None` unless micro mode is in effect.
    pub micro: Option<MicroState>,
    /// Pass summary.
    pub status: RecomputeStatus,
}

/// Holds the re-entrancy flag for the duration of a pass.
struct PassGuard<'a>(&'a Cell<bool>);

impl<'a> PassGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SceneEngine {
    /// Run a pass and return the canonical visible set.
    pub fn recompute(&self) -> Result<Arc<VisibleSet>, SceneError> {
        self.recompute_for("recompute")
    }

    /// Run a pass tagged with `reason`, which is handed to the refresh
    /// hook.
    ///
    /// Fails only when the UI state lacks filters or a frame. A call made
    /// while a pass is running returns the last committed visible set.
    pub fn recompute_for(
        &self,
        reason: &str,
    ) -> Result<Arc<VisibleSet>, SceneError> {
        let Some(_guard) = PassGuard::enter(&self.in_flight) else {
            log::trace!("recompute ({reason}) skipped: pass in flight");
            return Ok(Arc::clone(&self.snapshot.borrow().visible));
        };
        let snapshot = self.run_pass(reason)?;
        self.fire_hooks(&snapshot.selection, reason);
        Ok(Arc::clone(&snapshot.visible))
    }

    fn run_pass(&self, reason: &str) -> Result<Arc<Snapshot>, SceneError> {
        let document = Arc::clone(&self.document.borrow());
        let index = Arc::clone(&self.index.borrow());
        let micro_options = self.options.borrow().micro.clone();
        let mut ui = self.ui.borrow_mut();

        let filters = ui
            .filters
            .as_mut()
            .ok_or(SceneError::MissingFilters)?
            .canonicalize();
        let frame = ui
            .frame
            .as_mut()
            .ok_or(SceneError::MissingFrame)?
            .canonicalize();
        let requested = ui.mode;

        let visible = compute_visible_set(&VisibleSetInput {
            filters: &filters,
            active_frame: frame,
            index: Some(&index),
            document: &document,
        });

        let gate = micro_options.drop_selection_if_hidden.then_some(&visible);
        let selection = normalize_selection(&ui.selection, Some(&index), gate)
            .unwrap_or_default();
        ui.selection = selection.clone();
        let runtime = ui.runtime;
        let raw_micro = ui.micro.clone();
        drop(ui);

        let blocked_by = if requested == Mode::Micro {
            micro_block(micro_options.enabled, runtime, &selection, &visible)
        } else {
            None
        };
        let micro = (requested == Mode::Micro && blocked_by.is_none()).then(
            || {
                self.derive_micro(
                    raw_micro.as_ref(),
                    &selection,
                    &index,
                    &visible,
                    micro_options.max_related,
                )
            },
        );
        self.ui.borrow_mut().micro = micro.clone();

        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        let status = RecomputeStatus {
            sequence,
            requested_mode: requested,
            effective_mode: match (requested, &micro) {
                (Mode::Micro, None) => Mode::Macro,
                (mode, _) => mode,
            },
            micro_ready: micro.is_some(),
            blocked_by,
            frame,
            playing: runtime.is_playing,
        };

        log::debug!(
            "recompute #{sequence} ({reason}): {} visible at {frame:?}, \
             selection {:?}, mode {} -> {}",
            visible.len(),
            selection.id(),
            status.requested_mode,
            status.effective_mode,
        );
        if let Some(block) = blocked_by {
            log::trace!("micro blocked: {}", block.as_str());
        }

        let snapshot = Arc::new(Snapshot {
            visible: Arc::new(visible),
            selection,
            micro,
            status,
        });
        *self.snapshot.borrow_mut() = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// Normalize the stored micro state, re-deriving it when it is missing
    /// or focused on something other than the selection.
    fn derive_micro(
        &self,
        raw: Option<&MicroState>,
        selection: &Selection,
        index: &StructuralIndex,
        visible: &VisibleSet,
        max_related: usize,
    ) -> MicroState {
        let ctx = MicroContext::new(Mode::Micro)
            .with_selection(selection)
            .with_index(index)
            .with_visible(visible)
            .with_max_related(max_related);

        let stale = raw.and_then(MicroState::focus).map(str::trim)
            != selection.id();
        let mut micro = if stale {
            let derived = self.micro_compute.borrow().compute(selection, index);
            log::trace!(
                "micro re-derived for {:?}: {} related",
                selection.id(),
                derived.as_ref().map_or(0, |m| m.related_ids.len())
            );
            normalize_micro(derived.as_ref(), &ctx)
        } else {
            normalize_micro(raw, &ctx)
        };

        if micro.focus() != selection.id() {
            let aligned = MicroState {
                focus_id: selection.id.clone(),
                local_bounds: None,
                focus_position: None,
                ..micro
            };
            micro = normalize_micro(Some(&aligned), &ctx);
        }
        complete_geometry(&mut micro, index);
        micro
    }

    /// Selection hook then refresh hook, once each.
    ///
    /// Hooks are taken out of their slots while they run so they can
    /// re-enter the engine. A hook installed during the call replaces the
    /// one that ran.
    fn fire_hooks(&self, selection: &Selection, reason: &str) {
        let mut highlighter = std::mem::take(&mut *self.highlighter.borrow_mut());
        highlighter.dispatch(selection);
        {
            let mut slot = self.highlighter.borrow_mut();
            if slot.is_none() {
                *slot = highlighter;
            }
        }

        let refresh = self.refresh.borrow_mut().take();
        if let Some(mut refresh) = refresh {
            refresh(reason);
            let mut slot = self.refresh.borrow_mut();
            if slot.is_none() {
                *slot = Some(refresh);
            }
        }
    }
}

/// Guard or selection condition keeping micro mode from taking effect.
fn micro_block(
    micro_enabled: bool,
    runtime: RuntimeFlags,
    selection: &Selection,
    visible: &VisibleSet,
) -> Option<MicroBlock> {
    activity_block(micro_enabled, runtime).or_else(|| {
        match (selection.id(), selection.category) {
            (Some(id), Some(category)) if visible.get(category).contains(id) => {
                None
            }
            (Some(_), _) => Some(MicroBlock::SelectionHidden),
            (None, _) => Some(MicroBlock::NoSelection),
        }
    })
}
