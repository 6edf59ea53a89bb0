//! Intent methods: each one edits the UI inputs and runs a pass.

use std::sync::Arc;

use web_time::{Duration, Instant};

use super::command::ViewerCommand;
use super::SceneEngine;
use crate::error::SceneError;
use crate::scene::Category;
use crate::selection::Selection;
use crate::state::{AuxModule, Mode};
use crate::visibility::{is_visible, VisibleSet};

type PassResult = Result<Arc<VisibleSet>, SceneError>;

// ── Frame ──

impl SceneEngine {
    /// Make `frame` the active frame. It is clamped into range by the pass.
    pub fn set_frame(&self, frame: i64) -> PassResult {
        if let Some(state) = self.ui.borrow_mut().frame.as_mut() {
            state.current = Some(frame as f64);
        }
        self.recompute_for("frame")
    }

    /// Turn frame filtering off.
    pub fn clear_frame(&self) -> PassResult {
        if let Some(state) = self.ui.borrow_mut().frame.as_mut() {
            state.current = None;
        }
        self.recompute_for("frame")
    }

    /// Move the active frame by `delta`, wrapping inside the range. With
    /// frame filtering off the step starts from the range start.
    pub fn step_frame(&self, delta: i64) -> PassResult {
        if let Some(state) = self.ui.borrow_mut().frame.as_mut() {
            let current = state.canonicalize();
            let (min, max) = state.bounds();
            let (lo, hi) = (i128::from(min), i128::from(max));
            let base = i128::from(current.unwrap_or(min)) - lo;
            let next = (base + i128::from(delta)).rem_euclid(hi - lo + 1) + lo;
            let next = i64::try_from(next).unwrap_or(min);
            state.current = Some(next as f64);
        }
        self.recompute_for("frame")
    }
}

// ── Filters ──

impl SceneEngine {
    /// Show or hide a category.
    pub fn set_category_enabled(
        &self,
        category: Category,
        enabled: bool,
    ) -> PassResult {
        if let Some(filters) = self.ui.borrow_mut().filters.as_mut() {
            filters.set_category(category, enabled);
        }
        self.recompute_for("filters")
    }

    /// Flip a category filter.
    pub fn toggle_category(&self, category: Category) -> PassResult {
        if let Some(filters) = self.ui.borrow_mut().filters.as_mut() {
            let enabled = filters.category_enabled(category);
            filters.set_category(category, !enabled);
        }
        self.recompute_for("filters")
    }

    /// Switch a decoration on or off.
    pub fn set_aux_module(&self, module: AuxModule, enabled: bool) -> PassResult {
        if let Some(filters) = self.ui.borrow_mut().filters.as_mut() {
            filters.set_aux_module(module, enabled);
        }
        self.recompute_for("filters")
    }

    /// Flip a decoration.
    pub fn toggle_aux_module(&self, module: AuxModule) -> PassResult {
        if let Some(filters) = self.ui.borrow_mut().filters.as_mut() {
            let enabled = filters.aux_module_enabled(module);
            filters.set_aux_module(module, !enabled);
        }
        self.recompute_for("filters")
    }
}

// ── Selection ──

impl SceneEngine {
    /// Select `id`, or clear the selection with `None`. The pass drops ids
    /// that do not resolve.
    pub fn pick(&self, id: Option<&str>) -> PassResult {
        self.ui.borrow_mut().selection =
            id.map_or_else(Selection::none, Selection::of);
        self.recompute_for("selection")
    }

    /// Clear the selection.
    pub fn clear_selection(&self) -> PassResult {
        self.pick(None)
    }
}

// ── Mode / guards ──

impl SceneEngine {
    /// Whether micro mode may be entered on `id` right now.
    ///
    /// The id must name an element visible under the current filters and
    /// frame, micro effects must be enabled, and neither playback nor
    /// camera auto-motion may be running.
    #[must_use]
    pub fn can_enter(&self, id: &str) -> bool {
        if !self.options.borrow().micro.enabled {
            return false;
        }
        let ui = self.ui.borrow();
        if ui.runtime.is_playing || ui.runtime.is_camera_auto {
            return false;
        }
        let index = self.index.borrow();
        let Some((category, element)) = index.resolve(id.trim()) else {
            return false;
        };
        let Some(mut frame) = ui.frame else {
            return false;
        };
        ui.filters
            .as_ref()
            .is_some_and(|f| f.category_enabled(category))
            && is_visible(element, frame.canonicalize())
    }

    /// Enter micro mode focused on `id`, selecting it.
    ///
    /// Works from any mode; in micro mode it re-targets the focus. Returns
    /// `false` without touching any state when [`can_enter`](Self::can_enter)
    /// refuses.
    pub fn focus(&self, id: &str) -> Result<bool, SceneError> {
        if !self.can_enter(id) {
            log::debug!("focus {id:?} refused");
            return Ok(false);
        }
        {
            let mut ui = self.ui.borrow_mut();
            ui.mode = Mode::Micro;
            ui.selection = Selection::of(id.trim());
        }
        let _ = self.recompute_for("focus")?;
        Ok(true)
    }

    /// Enter micro mode on the current selection.
    pub fn focus_selection(&self) -> Result<bool, SceneError> {
        let selected = self.ui.borrow().selection.id.clone();
        match selected {
            Some(id) => self.focus(&id),
            None => Ok(false),
        }
    }

    /// Leave micro mode for macro, keeping the selection. Returns `false`
    /// when not in micro mode.
    pub fn exit(&self) -> Result<bool, SceneError> {
        {
            let mut ui = self.ui.borrow_mut();
            if ui.mode != Mode::Micro {
                return Ok(false);
            }
            ui.mode = Mode::Macro;
            ui.micro = None;
        }
        let _ = self.recompute_for("exit")?;
        Ok(true)
    }

    /// Back to macro mode from anywhere, clearing the selection.
    pub fn reset(&self) -> PassResult {
        {
            let mut ui = self.ui.borrow_mut();
            ui.mode = Mode::Macro;
            ui.selection = Selection::none();
            ui.micro = None;
        }
        self.recompute_for("reset")
    }

    /// Request a mode.
    ///
    /// Macro and meso always succeed and drop any micro state; the
    /// selection is kept. Micro is entered through
    /// [`focus_selection`](Self::focus_selection) and can be refused.
    pub fn set_mode(&self, mode: Mode) -> Result<bool, SceneError> {
        if mode == Mode::Micro {
            return self.focus_selection();
        }
        {
            let mut ui = self.ui.borrow_mut();
            ui.mode = mode;
            ui.micro = None;
        }
        let _ = self.recompute_for("mode")?;
        Ok(true)
    }
}

// ── Playback / camera ──

impl SceneEngine {
    /// Start or stop frame playback.
    pub fn set_playing(&self, playing: bool, now: Instant) -> PassResult {
        {
            let mut player = self.player.borrow_mut();
            if playing {
                player.play(now);
            } else {
                player.pause();
            }
        }
        self.ui.borrow_mut().runtime.is_playing = playing;
        self.recompute_for("playback")
    }

    /// Flip frame playback.
    pub fn toggle_playback(&self, now: Instant) -> PassResult {
        let playing = self.player.borrow().is_playing();
        self.set_playing(!playing, now)
    }

    /// Start or stop continuous camera auto-motion.
    pub fn set_camera_auto(&self, active: bool) -> PassResult {
        {
            let mut camera = self.camera.borrow_mut();
            if active {
                camera.start_continuous();
            } else {
                camera.stop();
            }
        }
        self.ui.borrow_mut().runtime.is_camera_auto = active;
        self.recompute_for("camera")
    }

    /// Flip continuous camera auto-motion.
    pub fn toggle_camera_motion(&self) -> PassResult {
        let active = self.camera.borrow().is_active();
        self.set_camera_auto(!active)
    }

    /// Start a timed camera transition using the configured duration. It
    /// ends on the first [`tick`](Self::tick) past its end time.
    pub fn start_camera_transition(&self, now: Instant) -> PassResult {
        let secs = self.options.borrow().camera.transition_secs;
        let duration = Duration::try_from_secs_f32(secs).unwrap_or_default();
        self.camera.borrow_mut().start_transition(now, duration);
        self.ui.borrow_mut().runtime.is_camera_auto = true;
        self.recompute_for("camera")
    }

    /// Advance playback and camera motion to `now`.
    ///
    /// Runs a pass only when something changed: a frame step, a finished
    /// camera transition, or playback stopping at the end of the range.
    /// Returns whether a pass ran.
    pub fn tick(&self, now: Instant) -> Result<bool, SceneError> {
        let camera_done = self.camera.borrow_mut().tick(now);

        let (current, bounds) = {
            let ui = self.ui.borrow();
            let Some(mut frame) = ui.frame else {
                return Err(SceneError::MissingFrame);
            };
            (frame.canonicalize(), frame.bounds())
        };
        let (next, still_playing) = {
            let mut player = self.player.borrow_mut();
            (player.tick(now, current, bounds), player.is_playing())
        };

        let mut ui = self.ui.borrow_mut();
        let stopped = ui.runtime.is_playing && !still_playing;
        if camera_done {
            ui.runtime.is_camera_auto = false;
        }
        if stopped {
            ui.runtime.is_playing = false;
        }
        if let (Some(next), Some(frame)) = (next, ui.frame.as_mut()) {
            frame.current = Some(next as f64);
        }
        drop(ui);

        if next.is_none() && !camera_done && !stopped {
            return Ok(false);
        }
        let _ = self.recompute_for("tick")?;
        Ok(true)
    }
}

// ── Commands ──

impl SceneEngine {
    /// Execute one command.
    pub fn execute(&self, command: ViewerCommand) -> Result<(), SceneError> {
        log::trace!("execute {command:?}");
        match command {
            ViewerCommand::SetFrame { frame } => {
                let _ = self.set_frame(frame)?;
            }
            ViewerCommand::StepFrame { delta } => {
                let _ = self.step_frame(delta)?;
            }
            ViewerCommand::ClearFrame => {
                let _ = self.clear_frame()?;
            }
            ViewerCommand::TogglePlayback => {
                let _ = self.toggle_playback(Instant::now())?;
            }
            ViewerCommand::ToggleCameraMotion => {
                let _ = self.toggle_camera_motion()?;
            }
            ViewerCommand::ToggleCategory { category } => {
                let _ = self.toggle_category(category)?;
            }
            ViewerCommand::SetCategory { category, enabled } => {
                let _ = self.set_category_enabled(category, enabled)?;
            }
            ViewerCommand::ToggleAuxModule { module } => {
                let _ = self.toggle_aux_module(module)?;
            }
            ViewerCommand::Select { id } => {
                let _ = self.pick(Some(&id))?;
            }
            ViewerCommand::ClearSelection => {
                let _ = self.clear_selection()?;
            }
            ViewerCommand::Focus { id } => {
                let _ = self.focus(&id)?;
            }
            ViewerCommand::FocusSelection => {
                let _ = self.focus_selection()?;
            }
            ViewerCommand::ExitMicro => {
                let _ = self.exit()?;
            }
            ViewerCommand::ResetView => {
                let _ = self.reset()?;
            }
            ViewerCommand::SetMode { mode } => {
                let _ = self.set_mode(mode)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::options::Options;
    use crate::scene::{Endpoint, SceneDocument, SceneElement};
    use crate::state::{Filters, FrameBounds, FrameState, MicroBlock, UiState};

    fn engine() -> SceneEngine {
        let doc = SceneDocument::new(
            vec![
                SceneElement::new("P1")
                    .with_frames(&[0.0, 1.0])
                    .at(Vec3::ZERO),
                SceneElement::new("P2").at(Vec3::X),
                SceneElement::new("P3").with_frame(3.0),
            ],
            vec![SceneElement::new("L1").connecting(
                Endpoint::to_element("P1"),
                Endpoint::to_element("P2"),
            )],
            vec![SceneElement::new("A1").hidden()],
        );
        let engine = SceneEngine::new(doc, Options::default());
        let _ = engine.recompute().unwrap();
        engine
    }

    #[test]
    fn frame_range_comes_from_document() {
        let engine = engine();
        let frame = engine.ui_state().frame.unwrap();
        assert_eq!(frame.bounds(), (0, 3));
        assert_eq!(engine.status().frame, Some(0));
    }

    #[test]
    fn step_frame_wraps() {
        let engine = engine();
        let _ = engine.step_frame(-1).unwrap();
        assert_eq!(engine.status().frame, Some(3));
        let _ = engine.step_frame(2).unwrap();
        assert_eq!(engine.status().frame, Some(1));
        let _ = engine.clear_frame().unwrap();
        let _ = engine.step_frame(1).unwrap();
        assert_eq!(engine.status().frame, Some(1));
    }

    #[test]
    fn step_frame_survives_extreme_ranges() {
        let doc = SceneDocument::from_json_str(
            r#"{"points":[{"id":"A","frames":[-1e19]},{"id":"B","frames":[1e19]}]}"#,
        )
        .unwrap();
        let engine = SceneEngine::new(doc, Options::default());
        assert_eq!(engine.index().frame_range(), (0, 0));
        let _ = engine.step_frame(1).unwrap();
        assert_eq!(engine.status().frame, Some(0));

        let frame = FrameState {
            current: Some(1e19),
            range: FrameBounds {
                min: -1e19,
                max: 1e19,
            },
        };
        let ui = UiState::new(Filters::default(), frame);
        let engine =
            SceneEngine::with_state(SceneDocument::default(), Options::default(), ui);
        let _ = engine.step_frame(1).unwrap();
        assert_eq!(engine.status().frame, Some(i64::MIN));
        let _ = engine.step_frame(-1).unwrap();
        assert_eq!(engine.status().frame, Some(i64::MAX));
        let _ = engine.step_frame(i64::MIN).unwrap();
        assert!(engine.status().frame.is_some());
    }

    #[test]
    fn set_frame_is_clamped() {
        let engine = engine();
        let visible = engine.set_frame(99).unwrap();
        assert_eq!(visible.frame_used, Some(3));
        assert!(visible.points.contains("P3"));
        assert!(!visible.points.contains("P1"));
    }

    #[test]
    fn guards_refuse_hidden_unknown_and_busy() {
        let engine = engine();
        assert!(engine.can_enter("P1"));
        assert!(engine.can_enter(" P2 "));
        assert!(!engine.can_enter("P3"));
        assert!(!engine.can_enter("A1"));
        assert!(!engine.can_enter("ghost"));

        let _ = engine.set_camera_auto(true).unwrap();
        assert!(!engine.can_enter("P1"));
        assert!(!engine.focus("P1").unwrap());
        assert_eq!(engine.mode(), Mode::Macro);
    }

    #[test]
    fn focus_derives_related_and_geometry() {
        let engine = engine();
        assert!(engine.focus("L1").unwrap());
        let micro = engine.micro_state().unwrap();
        assert_eq!(micro.focus(), Some("L1"));
        assert_eq!(micro.related_ids, ["P1", "P2"]);
        assert_eq!(micro.focus_position, Some(Vec3::new(0.5, 0.0, 0.0)));
        assert_eq!(engine.selection().category, Some(Category::Lines));

        assert!(engine.focus("P2").unwrap());
        let micro = engine.micro_state().unwrap();
        assert_eq!(micro.focus(), Some("P2"));
        assert_eq!(micro.related_ids, ["L1"]);
    }

    #[test]
    fn picking_in_micro_retargets_focus() {
        let engine = engine();
        assert!(engine.focus("P1").unwrap());
        let _ = engine.pick(Some("P2")).unwrap();
        assert_eq!(engine.micro_state().unwrap().focus(), Some("P2"));

        let _ = engine.clear_selection().unwrap();
        assert_eq!(engine.micro_state(), None);
        assert_eq!(engine.status().blocked_by, Some(MicroBlock::NoSelection));
        assert_eq!(engine.status().effective_mode, Mode::Macro);
    }

    #[test]
    fn playback_blocks_micro_until_stopped() {
        let engine = engine();
        assert!(engine.focus("P2").unwrap());
        let now = Instant::now();
        let _ = engine.set_playing(true, now).unwrap();
        assert_eq!(engine.micro_state(), None);
        assert_eq!(engine.status().blocked_by, Some(MicroBlock::Playing));
        assert_eq!(engine.mode(), Mode::Micro);

        let _ = engine.set_playing(false, now).unwrap();
        assert_eq!(engine.micro_state().unwrap().focus(), Some("P2"));
    }

    #[test]
    fn tick_advances_frames_while_playing() {
        let engine = engine();
        let start = Instant::now();
        assert!(!engine.tick(start).unwrap());
        let _ = engine.set_playing(true, start).unwrap();
        assert!(engine.tick(start + Duration::from_secs(1)).unwrap());
        assert_eq!(engine.status().frame, Some(1));
        assert!(engine.status().playing);
    }

    #[test]
    fn camera_transition_releases_guard_on_tick() {
        let engine = engine();
        let start = Instant::now();
        let _ = engine.start_camera_transition(start).unwrap();
        assert!(engine.is_camera_auto());
        assert!(engine.tick(start + Duration::from_secs(5)).unwrap());
        assert!(!engine.is_camera_auto());
        assert!(engine.can_enter("P1"));
    }

    #[test]
    fn set_mode_paths() {
        let engine = engine();
        assert!(!engine.set_mode(Mode::Micro).unwrap());
        let _ = engine.pick(Some("P1")).unwrap();
        assert!(engine.set_mode(Mode::Micro).unwrap());
        assert_eq!(engine.status().effective_mode, Mode::Micro);
        assert!(engine.set_mode(Mode::Meso).unwrap());
        assert_eq!(engine.micro_state(), None);
        assert_eq!(engine.selection().id(), Some("P1"));
        assert!(!engine.exit().unwrap());
    }

    #[test]
    fn reset_clears_selection() {
        let engine = engine();
        assert!(engine.focus("P1").unwrap());
        let _ = engine.reset().unwrap();
        assert_eq!(engine.mode(), Mode::Macro);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.micro_state(), None);
    }

    #[test]
    fn commands_drive_intents() {
        let engine = engine();
        engine
            .execute(ViewerCommand::ToggleCategory {
                category: Category::Points,
            })
            .unwrap();
        assert!(engine.visible_set().points.is_empty());
        engine
            .execute(ViewerCommand::SetCategory {
                category: Category::Points,
                enabled: true,
            })
            .unwrap();
        engine
            .execute(ViewerCommand::ToggleAuxModule {
                module: AuxModule::Axis,
            })
            .unwrap();
        assert!(engine.visible_set().aux_modules.axis);
        engine
            .execute(ViewerCommand::Focus {
                id: "P2".to_owned(),
            })
            .unwrap();
        assert_eq!(engine.mode(), Mode::Micro);
        engine.execute(ViewerCommand::ExitMicro).unwrap();
        assert_eq!(engine.mode(), Mode::Macro);
        assert_eq!(engine.selection().id(), Some("P2"));
    }
}
