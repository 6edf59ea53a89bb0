//! Frame visibility and visible-set derivation.

pub mod frame;
mod visible_set;

pub use frame::{is_visible, is_visible_on_frame};
pub use visible_set::{compute_visible_set, VisibleSet, VisibleSetInput};
