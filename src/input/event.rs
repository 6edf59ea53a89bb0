//! Pointer events reported by the host's viewport.
//!
//! The host owns the window and the picking pass; it forwards only cursor
//! motion and button changes, together with the id under the cursor, to
//! [`InputProcessor::handle_event`](super::InputProcessor::handle_event).
//! Wheel, modifiers and keyboard state stay with the host's camera.

/// One pointer change in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer now at `(x, y)`; drives drag detection.
    CursorMoved {
        /// Viewport x.
        x: f32,
        /// Viewport y.
        y: f32,
    },
    /// A button went down or came up. Only the primary button selects.
    MouseButton {
        /// Button that changed.
        button: MouseButton,
        /// Down (`true`) or up (`false`).
        pressed: bool,
    },
}

impl InputEvent {
    /// Primary button down or up.
    #[must_use]
    pub const fn primary(pressed: bool) -> Self {
        Self::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Selects and focuses elements.
    Left,
    /// Ignored for selection.
    Right,
    /// Ignored for selection.
    Middle,
}
