use web_time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Squared cursor travel (pixels) past which a press becomes a drag.
const DRAG_THRESHOLD_SQ: f32 = 1.0;

/// Result of processing a mouse-up event through the click state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickResult {
    /// No selection action (drag, mismatched up/down, etc.)
    NoAction,
    /// Single click on an element.
    SingleClick {
        /// Element under the cursor.
        id: String,
    },
    /// Second click on the same element within the threshold.
    DoubleClick {
        /// Element under the cursor.
        id: String,
    },
    /// Clicked on background.
    ClearSelection,
}

/// Tracks cursor position, drag state, and the multi-click state machine.
#[derive(Debug)]
pub(crate) struct ClickState {
    mouse_pos: (f32, f32),
    down_target: Option<String>,
    is_dragging: bool,
    last_click: Option<(Instant, String)>,
}

impl ClickState {
    pub(crate) fn new() -> Self {
        Self {
            mouse_pos: (0.0, 0.0),
            down_target: None,
            is_dragging: false,
            last_click: None,
        }
    }

    pub(crate) const fn mouse_pos(&self) -> (f32, f32) {
        self.mouse_pos
    }

    /// Record what element (if any) is under the cursor at mouse-down.
    pub(crate) fn handle_mouse_down(&mut self, hovered: Option<&str>) {
        self.down_target = hovered.map(str::to_owned);
        self.is_dragging = false;
    }

    /// Update the cursor position. Marks a drag when `pressed` and the
    /// cursor travelled far enough.
    pub(crate) fn handle_mouse_position(&mut self, x: f32, y: f32, pressed: bool) {
        let (dx, dy) = (x - self.mouse_pos.0, y - self.mouse_pos.1);
        self.mouse_pos = (x, y);
        if pressed && dx.mul_add(dx, dy * dy) > DRAG_THRESHOLD_SQ {
            self.is_dragging = true;
        }
    }

    /// Process a mouse-up event and return what kind of click happened.
    pub(crate) fn process_mouse_up(
        &mut self,
        hovered: Option<&str>,
        now: Instant,
    ) -> ClickResult {
        let down = self.down_target.take();
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);

        if was_dragging {
            self.last_click = None;
            return ClickResult::NoAction;
        }

        match (down.as_deref(), hovered) {
            (Some(down), Some(up)) if down == up => {
                let repeated = self.last_click.as_ref().is_some_and(
                    |(at, id)| {
                        id == up
                            && now.duration_since(*at) < DOUBLE_CLICK_THRESHOLD
                    },
                );
                if repeated {
                    self.last_click = None;
                    ClickResult::DoubleClick { id: up.to_owned() }
                } else {
                    self.last_click = Some((now, up.to_owned()));
                    ClickResult::SingleClick { id: up.to_owned() }
                }
            }
            (None, None) => {
                self.last_click = None;
                ClickResult::ClearSelection
            }
            _ => {
                self.last_click = None;
                ClickResult::NoAction
            }
        }
    }
}
