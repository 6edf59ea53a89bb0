//! Input handling: event types, the click state machine, and the input
//! processor that turns viewport events and key presses into commands.

/// Double-click state machine and cursor tracking.
pub(crate) mod click;
/// Pointer events from the host viewport.
pub mod event;
/// Converts raw events into engine commands.
pub mod processor;

pub use click::ClickResult;
pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
