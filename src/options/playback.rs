use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::playback::DEFAULT_FPS;

/// Frame playback parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Frames per second while playing.
    #[schemars(title = "Speed", range(min = 0.1, max = 60.0), extend("step" = 0.5))]
    pub fps: f32,
    /// Wrap to the first frame after the last.
    #[schemars(title = "Loop")]
    pub looping: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            looping: true,
        }
    }
}
