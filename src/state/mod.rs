//! Caller-owned UI inputs: filters, frame, mode, selection and runtime
//! flags.
//!
//! [`UiState`] is written by the engine's intent methods and read by the
//! recompute pass, which canonicalizes filters and frame in place before
//! anything downstream looks at them.

mod filters;
mod frame;
pub(crate) mod mode;

pub use filters::{
    AuxModule, AuxModuleFlags, AuxModules, CanonicalFilters, Filters,
    TypeFilters,
};
pub use frame::{FrameBounds, FrameState};
pub use mode::{MicroBlock, Mode, RuntimeFlags};

use crate::micro::MicroState;
use crate::selection::Selection;

/// Volatile UI intent.
///
/// `filters` and `frame` are required by the recompute pass; leaving either
/// unset is a caller contract violation reported as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Category and decoration filters.
    pub filters: Option<Filters>,
    /// Active frame and timeline range.
    pub frame: Option<FrameState>,
    /// Requested interaction mode.
    pub mode: Mode,
    /// Current selection.
    pub selection: Selection,
    /// Micro focus state; present only while micro mode is in effect.
    pub micro: Option<MicroState>,
    /// Playback and camera activity.
    pub runtime: RuntimeFlags,
}

impl UiState {
    /// Macro-mode state with nothing selected.
    #[must_use]
    pub fn new(filters: Filters, frame: FrameState) -> Self {
        Self {
            filters: Some(filters),
            frame: Some(frame),
            ..Self::default()
        }
    }
}
