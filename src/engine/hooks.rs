//! Side-effect hooks fired once per recompute pass.

use std::fmt;

use crate::selection::Selection;

/// Receiver for selection highlight updates.
pub trait SelectionSink {
    /// Highlight the canonical selection.
    fn apply(&mut self, selection: &Selection);
    /// Remove any highlight.
    fn clear(&mut self);
}

/// Selection highlighter, chosen once when it is wired in.
#[derive(Default)]
pub enum HighlightBackend {
    /// No highlighting.
    #[default]
    None,
    /// Log selection changes at debug level.
    Log,
    /// Forward to a caller-supplied sink.
    Sink(Box<dyn SelectionSink>),
}

impl HighlightBackend {
    /// Deliver the pass result: `apply` for a selection, `clear` otherwise.
    pub(crate) fn dispatch(&mut self, selection: &Selection) {
        match (self, selection.id()) {
            (Self::None, _) => {}
            (Self::Log, Some(id)) => {
                log::debug!("highlight {id} ({:?})", selection.category);
            }
            (Self::Log, None) => log::debug!("highlight cleared"),
            (Self::Sink(sink), Some(_)) => sink.apply(selection),
            (Self::Sink(sink), None) => sink.clear(),
        }
    }

    pub(crate) const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for HighlightBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Log => f.write_str("Log"),
            Self::Sink(_) => f.write_str("Sink(..)"),
        }
    }
}

/// Called once at the end of every pass with the pass reason.
pub type RefreshHook = Box<dyn FnMut(&str)>;
