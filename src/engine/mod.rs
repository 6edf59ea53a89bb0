//! Scene state engine: owns the document, the caller's UI inputs and the
//! canonical snapshot derived from them.
//!
//! Intent methods (frame, filters, selection, mode, playback) mutate the
//! inputs and then run a recompute pass. The pass in [`recompute`] is the
//! only code that writes the canonical snapshot; everything else reads it.
//!
//! The engine is single-threaded and takes `&self` everywhere, so hooks
//! holding an `Rc` back to it can call in while a pass is running.

pub mod command;
pub mod hooks;
mod intents;
mod recompute;

use std::cell::{Cell, RefCell};
use std::sync::Arc;

pub use command::ViewerCommand;
pub use hooks::{HighlightBackend, RefreshHook, SelectionSink};
pub use recompute::{RecomputeStatus, Snapshot};

use crate::camera::CameraMotion;
use crate::error::SceneError;
use crate::micro::{MicroCompute, MicroState, StructuralMicro};
use crate::options::Options;
use crate::playback::FramePlayer;
use crate::scene::{SceneDocument, StructuralIndex};
use crate::selection::Selection;
use crate::state::{FrameState, Mode, UiState};
use crate::visibility::VisibleSet;

/// Recomputation engine for one viewer.
pub struct SceneEngine {
    document: RefCell<Arc<SceneDocument>>,
    index: RefCell<Arc<StructuralIndex>>,
    ui: RefCell<UiState>,
    options: RefCell<Options>,
    snapshot: RefCell<Arc<Snapshot>>,
    highlighter: RefCell<HighlightBackend>,
    refresh: RefCell<Option<RefreshHook>>,
    micro_compute: RefCell<Box<dyn MicroCompute>>,
    player: RefCell<FramePlayer>,
    camera: RefCell<CameraMotion>,
    /// Set while a recompute pass runs.
    in_flight: Cell<bool>,
    sequence: Cell<u64>,
}

impl SceneEngine {
    /// Engine over `document` with UI inputs seeded from `options`: the
    /// configured filters, and the document's frame range with the active
    /// frame at its start.
    ///
    /// No pass runs until the first intent or [`recompute`](Self::recompute).
    #[must_use]
    pub fn new(document: SceneDocument, options: Options) -> Self {
        let document = Arc::new(document);
        let index = StructuralIndex::build(Arc::clone(&document));
        let (min, max) = index.frame_range();
        let ui = UiState::new(options.filters, FrameState::new(min, max));
        Self::assemble(document, index, options, ui)
    }

    /// Engine with caller-supplied UI inputs.
    #[must_use]
    pub fn with_state(
        document: SceneDocument,
        options: Options,
        ui: UiState,
    ) -> Self {
        let document = Arc::new(document);
        let index = StructuralIndex::build(Arc::clone(&document));
        Self::assemble(document, index, options, ui)
    }

    fn assemble(
        document: Arc<SceneDocument>,
        index: StructuralIndex,
        options: Options,
        ui: UiState,
    ) -> Self {
        let player =
            FramePlayer::new(options.playback.fps, options.playback.looping);
        Self {
            document: RefCell::new(document),
            index: RefCell::new(Arc::new(index)),
            ui: RefCell::new(ui),
            options: RefCell::new(options),
            snapshot: RefCell::new(Arc::default()),
            highlighter: RefCell::new(HighlightBackend::None),
            refresh: RefCell::new(None),
            micro_compute: RefCell::new(Box::new(StructuralMicro)),
            player: RefCell::new(player),
            camera: RefCell::new(CameraMotion::default()),
            in_flight: Cell::new(false),
            sequence: Cell::new(0),
        }
    }

    /// Replace the document and its index wholesale.
    ///
    /// The timeline range is reset to the new document's frames, the active
    /// frame moves to the range start (unless frame filtering was off) and
    /// any micro state is dropped. Runs a pass.
    pub fn load_document(
        &self,
        document: SceneDocument,
    ) -> Result<Arc<VisibleSet>, SceneError> {
        let document = Arc::new(document);
        let index = StructuralIndex::build(Arc::clone(&document));
        let (min, max) = index.frame_range();
        {
            let mut ui = self.ui.borrow_mut();
            let filtering = ui.frame.is_none_or(|f| f.current.is_some());
            ui.frame = Some(if filtering {
                FrameState::new(min, max)
            } else {
                FrameState::unfiltered(min, max)
            });
            ui.micro = None;
        }
        *self.document.borrow_mut() = document;
        *self.index.borrow_mut() = Arc::new(index);
        self.recompute_for("document")
    }

    // -- Wiring -----------------------------------------------------------

    /// Install the selection highlighter.
    pub fn set_highlighter(&self, backend: HighlightBackend) {
        log::debug!("highlighter: {backend:?}");
        *self.highlighter.borrow_mut() = backend;
    }

    /// Install or remove the refresh hook.
    pub fn set_refresh_hook(&self, hook: Option<RefreshHook>) {
        *self.refresh.borrow_mut() = hook;
    }

    /// Replace the micro derivation.
    pub fn set_micro_compute(&self, compute: Box<dyn MicroCompute>) {
        *self.micro_compute.borrow_mut() = compute;
    }

    /// Replace the options. Playback settings apply immediately; runs a
    /// pass so micro settings take effect.
    pub fn set_options(
        &self,
        options: Options,
    ) -> Result<Arc<VisibleSet>, SceneError> {
        {
            let mut player = self.player.borrow_mut();
            player.set_fps(options.playback.fps);
            player.set_looping(options.playback.looping);
        }
        *self.options.borrow_mut() = options;
        self.recompute_for("options")
    }

    // -- Readers ----------------------------------------------------------

    /// Last committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Canonical visible set.
    #[must_use]
    pub fn visible_set(&self) -> Arc<VisibleSet> {
        Arc::clone(&self.snapshot.borrow().visible)
    }

    /// Canonical selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.snapshot.borrow().selection.clone()
    }

    /// Canonical micro state.
    #[must_use]
    pub fn micro_state(&self) -> Option<MicroState> {
        self.snapshot.borrow().micro.clone()
    }

    /// Summary of the last pass.
    #[must_use]
    pub fn status(&self) -> RecomputeStatus {
        self.snapshot.borrow().status.clone()
    }

    /// Requested mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ui.borrow().mode
    }

    /// Copy of the current UI inputs.
    #[must_use]
    pub fn ui_state(&self) -> UiState {
        self.ui.borrow().clone()
    }

    /// Current document.
    #[must_use]
    pub fn document(&self) -> Arc<SceneDocument> {
        Arc::clone(&self.document.borrow())
    }

    /// Index over the current document.
    #[must_use]
    pub fn index(&self) -> Arc<StructuralIndex> {
        Arc::clone(&self.index.borrow())
    }

    /// Copy of the current options.
    #[must_use]
    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    /// Whether frame playback is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.ui.borrow().runtime.is_playing
    }

    /// Whether camera auto-motion is active.
    #[must_use]
    pub fn is_camera_auto(&self) -> bool {
        self.ui.borrow().runtime.is_camera_auto
    }
}

impl std::fmt::Debug for SceneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEngine")
            .field("elements", &self.document.borrow().element_count())
            .field("ui", &self.ui.borrow())
            .field("status", &self.snapshot.borrow().status)
            .finish_non_exhaustive()
    }
}
