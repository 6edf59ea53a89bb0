use serde::{Deserialize, Serialize};

/// Viewer interaction mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Whole-scene overview.
    #[default]
    Macro,
    /// Intermediate zoom; behaves like macro for recomputation.
    Meso,
    /// One focused element plus related ones.
    Micro,
}

impl Mode {
    /// Mode name as used by callers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macro => "macro",
            Self::Meso => "meso",
            Self::Micro => "micro",
        }
    }

    /// Parse a mode name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "macro" => Some(Self::Macro),
            "meso" => Some(Self::Meso),
            "micro" => Some(Self::Micro),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason micro mode is not in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicroBlock {
    /// Micro effects are switched off in the options.
    MicroDisabled,
    /// Frame playback is running.
    Playing,
    /// The camera is moving on its own.
    CameraAuto,
    /// Nothing is selected.
    NoSelection,
    /// The selection is not in the visible set.
    SelectionHidden,
}

impl MicroBlock {
    /// Short machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MicroDisabled => "micro_disabled",
            Self::Playing => "frame_playing",
            Self::CameraAuto => "camera_auto",
            Self::NoSelection => "no_selection",
            Self::SelectionHidden => "selection_hidden",
        }
    }
}

/// Runtime activity that gates micro mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuntimeFlags {
    /// Frame playback is advancing.
    pub is_playing: bool,
    /// Camera auto-motion is active.
    pub is_camera_auto: bool,
}

/// First guard that blocks micro mode regardless of the selection, checked
/// in the order: option switch, playback, camera motion.
#[must_use]
pub(crate) fn activity_block(
    micro_enabled: bool,
    runtime: RuntimeFlags,
) -> Option<MicroBlock> {
    if !micro_enabled {
        Some(MicroBlock::MicroDisabled)
    } else if runtime.is_playing {
        Some(MicroBlock::Playing)
    } else if runtime.is_camera_auto {
        Some(MicroBlock::CameraAuto)
    } else {
        None
    }
}
