//! Per-element frame visibility.

use crate::scene::{FrameRestriction, SceneElement};

/// Whether `element` is displayable on `active_frame`.
///
/// The own-visibility flag is checked first and hides the element on every
/// frame. An absent active frame disables frame filtering.
#[must_use]
pub fn is_visible(element: &SceneElement, active_frame: Option<i64>) -> bool {
    element.visible && is_visible_on_frame(&element.frames, active_frame)
}

/// Frame test alone, ignoring the own-visibility flag.
///
/// Restriction forms are tried in order and the first one present decides:
/// a discrete list (an empty list restricts nothing), a single frame, then
/// an inclusive span.
#[must_use]
pub fn is_visible_on_frame(
    restriction: &FrameRestriction,
    active_frame: Option<i64>,
) -> bool {
    let Some(frame) = active_frame else {
        return true;
    };
    let frame = frame as f64;

    if let Some(list) = &restriction.list {
        return list.is_empty() || list.contains(&frame);
    }
    if let Some(single) = restriction.single {
        return single == frame;
    }
    restriction.range.is_none_or(|span| span.contains(frame))
}
