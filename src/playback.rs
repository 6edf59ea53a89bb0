//! Fixed-cadence frame playback.
//!
//! The player only decides *when* the next frame is due and which frame it
//! is. The engine applies the step through its normal frame intent, so
//! playback never writes viewer state directly.

use web_time::{Duration, Instant};

/// Default playback speed in frames per second.
pub const DEFAULT_FPS: f32 = 6.0;

/// Frame sequencer that auto-advances at a configurable speed.
#[derive(Debug, Clone)]
pub struct FramePlayer {
    last_advance: Instant,
    frame_duration: Duration,
    playing: bool,
    looping: bool,
}

impl FramePlayer {
    /// Paused player running at `fps` once started.
    #[must_use]
    pub fn new(fps: f32, looping: bool) -> Self {
        let mut player = Self {
            last_advance: Instant::now(),
            frame_duration: Duration::ZERO,
            playing: false,
            looping,
        };
        player.set_fps(fps);
        player
    }

    /// Next frame to show if a step is due at `now`.
    ///
    /// Steps are `+1` inside the inclusive `bounds`. Past the end the player
    /// wraps to the first frame when looping, otherwise it stops and
    /// returns `None`. An absent `current` frame starts from the first one.
    pub fn tick(
        &mut self,
        now: Instant,
        current: Option<i64>,
        bounds: (i64, i64),
    ) -> Option<i64> {
        if !self.playing {
            return None;
        }
        if now.duration_since(self.last_advance) < self.frame_duration {
            return None;
        }
        self.last_advance = now;

        let (min, max) = bounds;
        match current {
            None => return Some(min),
            Some(frame) if frame < min => return Some(min),
            Some(frame) if frame < max => return Some(frame + 1),
            Some(_) => {}
        }
        if self.looping {
            Some(min)
        } else {
            self.playing = false;
            None
        }
    }

    /// Start playing; the first step is due one frame after `now`.
    pub fn play(&mut self, now: Instant) {
        self.playing = true;
        self.last_advance = now;
    }

    /// Stop advancing.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Toggle between playing and paused. Returns the new state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.playing {
            self.pause();
        } else {
            self.play(now);
        }
        self.playing
    }

    /// Set playback speed in frames per second (clamped to >= 0.1).
    pub fn set_fps(&mut self, fps: f32) {
        let fps = if fps.is_finite() { fps.max(0.1) } else { DEFAULT_FPS };
        self.frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
    }

    /// Enable or disable wrapping at the end of the range.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Time between steps.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Whether the player is currently advancing frames.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the player wraps at the end of the range.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self::new(DEFAULT_FPS, true)
    }
}
