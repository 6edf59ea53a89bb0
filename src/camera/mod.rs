//! Camera auto-motion tracking.
//!
//! Camera integration lives with the renderer. The engine only needs to
//! know *whether* the camera is moving on its own (a fly-to transition or a
//! turntable spin), because micro mode is blocked while it is.

use web_time::{Duration, Instant};

/// Auto-motion state: idle, a timed transition, or continuous spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraMotion {
    /// When the current motion ends; `None` for continuous motion.
    until: Option<Instant>,
    active: bool,
}

impl CameraMotion {
    /// Begin a timed transition lasting `duration` from `now`.
    pub fn start_transition(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
        self.active = true;
    }

    /// Begin continuous motion that runs until stopped.
    pub fn start_continuous(&mut self) {
        self.until = None;
        self.active = true;
    }

    /// Stop any motion.
    pub fn stop(&mut self) {
        self.until = None;
        self.active = false;
    }

    /// Toggle continuous motion. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.active {
            self.stop();
        } else {
            self.start_continuous();
        }
        self.active
    }

    /// Advance time. Returns `true` when a timed transition finished on
    /// this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if self.active && now >= until => {
                self.stop();
                true
            }
            _ => false,
        }
    }

    /// Whether the camera is moving on its own.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_ends_after_duration() {
        let start = Instant::now();
        let mut motion = CameraMotion::default();
        motion.start_transition(start, Duration::from_millis(300));
        assert!(motion.is_active());
        assert!(!motion.tick(start + Duration::from_millis(100)));
        assert!(motion.tick(start + Duration::from_millis(300)));
        assert!(!motion.is_active());
        assert!(!motion.tick(start + Duration::from_secs(1)));
    }

    #[test]
    fn continuous_motion_runs_until_toggled() {
        let mut motion = CameraMotion::default();
        assert!(motion.toggle());
        assert!(!motion.tick(Instant::now() + Duration::from_secs(3600)));
        assert!(motion.is_active());
        assert!(!motion.toggle());
    }
}
