//! Viewer options with TOML preset support.
//!
//! Micro focus behaviour, playback speed, camera timing, initial filters
//! and key bindings are consolidated here. Options serialize to/from TOML
//! for presets stored alongside a scene.

mod camera;
mod micro;
mod playback;

use std::path::Path;

pub use camera::CameraOptions;
pub use micro::MicroOptions;
pub use playback::PlaybackOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::input::KeyBindings;
use crate::state::Filters;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[playback]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Micro focus mode parameters.
    pub micro: MicroOptions,
    /// Frame playback parameters.
    pub playback: PlaybackOptions,
    /// Camera auto-motion parameters.
    pub camera: CameraOptions,
    /// Filters applied when a scene is loaded.
    pub filters: Filters,
    /// Key bindings handed to
    /// [`InputProcessor::from_options`](crate::input::InputProcessor::from_options).
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(SceneError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SceneError::Io)?;
        }
        std::fs::write(path, content).map_err(SceneError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::ViewerCommand;
    use crate::scene::Category;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[playback]
fps = 12.0

[filters.types]
lines = false
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.playback.fps, 12.0);
        assert!(opts.playback.looping);
        assert_eq!(opts.micro, MicroOptions::default());
        assert!(!opts.filters.category_enabled(Category::Lines));
        assert!(opts.filters.category_enabled(Category::Points));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(ViewerCommand::TogglePlayback)
        );
        assert_eq!(
            opts.keybindings.lookup("Escape"),
            Some(ViewerCommand::ClearSelection)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("sceneview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.micro.max_related = 32;
        opts.save(&dir.join("dense.toml")).unwrap();
        Options::default().save(&dir.join("calm.toml")).unwrap();

        assert_eq!(Options::list_presets(&dir), ["calm", "dense"]);
        let loaded = Options::load(&dir.join("dense.toml")).unwrap();
        assert_eq!(loaded.micro.max_related, 32);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_toml_is_an_options_error() {
        let dir = std::env::temp_dir()
            .join(format!("sceneview-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[micro\nenabled = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(SceneError::OptionsParse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("micro"));
        assert!(props.contains_key("playback"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("filters"));
        assert!(!props.contains_key("keybindings"));

        let micro = &props["micro"]["properties"];
        assert!(micro.get("max_related").is_some());
        assert!(micro.get("drop_selection_if_hidden").is_some());
    }
}
