use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera auto-motion parameters.
pub struct CameraOptions {
    /// Length of a fly-to transition in seconds.
    #[schemars(title = "Transition Time", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub transition_secs: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            transition_secs: 0.6,
        }
    }
}
