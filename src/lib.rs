// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Scene state recomputation for an interactive 3D scene viewer.
//!
//! A scene document holds three categories of elements (anchor points,
//! connector lines and auxiliary markers), each optionally restricted to
//! a set of animation frames. Sceneview turns the document plus the
//! viewer's volatile UI state (filters, active frame, selection, mode)
//! into one consistent snapshot: the visible set, the canonical
//! selection and the micro focus state.
//!
//! # Key entry points
//!
//! - [`engine::SceneEngine`] - owns the inputs and runs recompute passes
//! - [`scene::SceneDocument`] / [`scene::StructuralIndex`] - the document
//!   and its lookup structures
//! - [`visibility::compute_visible_set`] - the pure visibility function
//! - [`options::Options`] - runtime configuration (micro, playback,
//!   camera, default filters, key bindings)
//!
//! # Architecture
//!
//! Intent methods on the engine edit the UI inputs and then run a single
//! recompute pass. The pass canonicalizes filters and frame, derives the
//! visible set from the index, normalizes the selection against it and,
//! in micro mode, derives the micro state. The snapshot is swapped in
//! whole, and only then do the selection and refresh hooks fire.

pub mod camera;
pub mod engine;
pub mod error;
pub mod input;
pub mod micro;
pub mod options;
pub mod playback;
pub mod scene;
pub mod selection;
pub mod state;
pub mod visibility;
