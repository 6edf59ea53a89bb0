use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::micro::DEFAULT_MAX_RELATED;

/// Micro focus mode parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Micro", inline)]
#[serde(default)]
pub struct MicroOptions {
    /// Allow micro focus at all.
    #[schemars(title = "Micro Effects")]
    pub enabled: bool,
    /// Cap on related elements shown around the focus.
    #[schemars(title = "Max Related", range(min = 0, max = 10000))]
    pub max_related: usize,
    /// Drop the selection when its element leaves the visible set.
    #[schemars(title = "Drop Hidden Selection")]
    pub drop_selection_if_hidden: bool,
}

impl Default for MicroOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_related: DEFAULT_MAX_RELATED,
            drop_selection_if_hidden: true,
        }
    }
}
