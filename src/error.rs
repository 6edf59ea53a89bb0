//! Crate-level error types.

use std::fmt;

/// Errors produced by the sceneview crate.
///
/// Malformed scene data never surfaces here: bad frame descriptors and
/// unresolvable ids degrade to safe fallbacks. These variants cover caller
/// contract violations and I/O around documents and option presets.
#[derive(Debug)]
pub enum SceneError {
    /// The UI state has no filters object; the caller never initialised it.
    MissingFilters,
    /// The UI state has no frame object; the caller never initialised it.
    MissingFrame,
    /// Failed to parse a scene document.
    DocumentParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFilters => {
                write!(f, "contract violation: ui state has no filters")
            }
            Self::MissingFrame => {
                write!(f, "contract violation: ui state has no frame")
            }
            Self::DocumentParse(msg) => {
                write!(f, "scene document parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        Self::DocumentParse(e.to_string())
    }
}
