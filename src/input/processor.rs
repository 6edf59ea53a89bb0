//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, double-click timing) and the key-binding map. It is the
//! only thing that sits between raw window events and the engine's
//! [`execute`](crate::engine::SceneEngine::execute) method.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::click::{ClickResult, ClickState};
use super::event::{InputEvent, MouseButton};
use crate::engine::command::ViewerCommand;
use crate::options::Options;
use crate::scene::Category;
use crate::state::AuxModule;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the DOM `KeyboardEvent.code` format: `"KeyG"`,
/// `"Space"`, `"Escape"`, etc.
///
/// Only *discrete* commands (toggles, actions) make sense as key
/// bindings; commands that carry an element id come from picking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`ViewerCommand`] that can be
/// key-bound (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Start or pause frame playback.
    TogglePlayback,
    /// Next frame.
    StepForward,
    /// Previous frame.
    StepBack,
    /// Show or hide anchor points.
    TogglePoints,
    /// Show or hide connectors.
    ToggleLines,
    /// Show or hide auxiliary markers.
    ToggleAux,
    /// Show or hide the reference grid.
    ToggleGrid,
    /// Show or hide the axis gizmo.
    ToggleAxis,
    /// Start or stop camera auto-motion.
    ToggleCameraMotion,
    /// Enter micro mode on the selection.
    FocusSelection,
    /// Leave micro mode.
    ExitMicro,
    /// Back to the macro overview.
    ResetView,
    /// Cancel / clear selection.
    Cancel,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`ViewerCommand`].
    fn to_command(self) -> ViewerCommand {
        match self {
            Self::TogglePlayback => ViewerCommand::TogglePlayback,
            Self::StepForward => ViewerCommand::StepFrame { delta: 1 },
            Self::StepBack => ViewerCommand::StepFrame { delta: -1 },
            Self::TogglePoints => ViewerCommand::ToggleCategory {
                category: Category::Points,
            },
            Self::ToggleLines => ViewerCommand::ToggleCategory {
                category: Category::Lines,
            },
            Self::ToggleAux => ViewerCommand::ToggleCategory {
                category: Category::Aux,
            },
            Self::ToggleGrid => ViewerCommand::ToggleAuxModule {
                module: AuxModule::Grid,
            },
            Self::ToggleAxis => ViewerCommand::ToggleAuxModule {
                module: AuxModule::Axis,
            },
            Self::ToggleCameraMotion => ViewerCommand::ToggleCameraMotion,
            Self::FocusSelection => ViewerCommand::FocusSelection,
            Self::ExitMicro => ViewerCommand::ExitMicro,
            Self::ResetView => ViewerCommand::ResetView,
            Self::Cancel => ViewerCommand::ClearSelection,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Space".into(), KeyCommandTag::TogglePlayback),
            ("ArrowRight".into(), KeyCommandTag::StepForward),
            ("ArrowLeft".into(), KeyCommandTag::StepBack),
            ("Digit1".into(), KeyCommandTag::TogglePoints),
            ("Digit2".into(), KeyCommandTag::ToggleLines),
            ("Digit3".into(), KeyCommandTag::ToggleAux),
            ("KeyG".into(), KeyCommandTag::ToggleGrid),
            ("KeyX".into(), KeyCommandTag::ToggleAxis),
            ("KeyR".into(), KeyCommandTag::ToggleCameraMotion),
            ("KeyF".into(), KeyCommandTag::FocusSelection),
            ("KeyM".into(), KeyCommandTag::ExitMicro),
            ("Backquote".into(), KeyCommandTag::ResetView),
            ("Escape".into(), KeyCommandTag::Cancel),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }

    /// Remove the binding for `key`.
    pub fn unbind(&mut self, key: &str) {
        let _ = self.bindings.remove(key);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) =
///     input_processor.handle_event(event, hovered.as_deref(), Instant::now())
/// {
///     engine.execute(cmd)?;
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("Space") {
///     engine.execute(cmd)?;
/// }
/// ```
#[derive(Debug)]
pub struct InputProcessor {
    /// Cursor tracking and double-click state machine.
    state: ClickState,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ClickState::new(),
            mouse_pressed: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor using the key bindings from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self::with_key_bindings(options.keybindings.clone())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.state.mouse_pos()
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// `hovered` is the element id currently under the cursor, as reported
    /// by the renderer's picking pass.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        hovered: Option<&str>,
        now: Instant,
    ) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.state.handle_mouse_position(x, y, self.mouse_pressed);
                None
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, hovered, now)
            }
        }
    }

    /// Mouse button press/release: track state, produce selection commands
    /// on release.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        hovered: Option<&str>,
        now: Instant,
    ) -> Option<ViewerCommand> {
        if button != MouseButton::Left {
            return None;
        }

        if pressed {
            self.state.handle_mouse_down(hovered);
            self.mouse_pressed = true;
            return None;
        }

        self.mouse_pressed = false;
        match self.state.process_mouse_up(hovered, now) {
            ClickResult::NoAction => None,
            ClickResult::SingleClick { id } => Some(ViewerCommand::Select { id }),
            ClickResult::DoubleClick { id } => Some(ViewerCommand::Focus { id }),
            ClickResult::ClearSelection => Some(ViewerCommand::ClearSelection),
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}
