//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a key press, a pick
//! gesture or a programmatic call, is a `ViewerCommand`. Consumers build
//! commands and pass them to
//! [`SceneEngine::execute`](super::SceneEngine::execute).

use crate::scene::Category;
use crate::state::{AuxModule, Mode};

/// A single interactive operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    // ── Frame ───────────────────────────────────────────────────────
    /// Jump to a frame (clamped into the timeline range).
    SetFrame {
        /// Target frame.
        frame: i64,
    },

    /// Move the active frame by `delta`, wrapping inside the range.
    StepFrame {
        /// Frames to advance; negative steps back.
        delta: i64,
    },

    /// Disable frame filtering so every frame's elements show.
    ClearFrame,

    // ── Playback ────────────────────────────────────────────────────
    /// Start or pause frame playback.
    TogglePlayback,

    /// Start or stop camera auto-motion.
    ToggleCameraMotion,

    // ── Filters ─────────────────────────────────────────────────────
    /// Flip one category filter.
    ToggleCategory {
        /// Category to flip.
        category: Category,
    },

    /// Set one category filter.
    SetCategory {
        /// Category to set.
        category: Category,
        /// Whether the category is shown.
        enabled: bool,
    },

    /// Flip one decoration.
    ToggleAuxModule {
        /// Decoration to flip.
        module: AuxModule,
    },

    // ── Selection ───────────────────────────────────────────────────
    /// Select an element by id.
    Select {
        /// Element id.
        id: String,
    },

    /// Clear the selection.
    ClearSelection,

    // ── Mode ────────────────────────────────────────────────────────
    /// Enter micro mode focused on an element.
    Focus {
        /// Element id.
        id: String,
    },

    /// Enter micro mode on the current selection.
    FocusSelection,

    /// Leave micro mode, keeping the selection.
    ExitMicro,

    /// Back to macro mode with nothing selected.
    ResetView,

    /// Request a mode.
    SetMode {
        /// Requested mode.
        mode: Mode,
    },
}
