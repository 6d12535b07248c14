//! Game settings: balance tuning plus key bindings
//!
//! Native builds read a JSON file, the browser build reads LocalStorage.
//! Missing fields fall back to defaults, so a file only lists what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::KeyBindings;
use crate::tuning::Tuning;

/// Failure to read or parse a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub bindings: KeyBindings,
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "tile_runner_settings";

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Key names are matched lowercase
    fn normalize(&mut self) {
        for keys in [
            &mut self.bindings.left,
            &mut self.bindings.right,
            &mut self.bindings.jump,
        ] {
            for key in keys.iter_mut() {
                *key = key.to_lowercase();
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `path` if given, defaults otherwise.
    /// A broken file is logged and ignored.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::from_path(path).unwrap_or_else(|e| {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "tuning": { "move_speed": 6.5 },
            "bindings": { "jump": ["W", "ArrowUp"] }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.tuning.move_speed, 6.5);
        assert_eq!(settings.tuning.gravity, Tuning::default().gravity);
        assert_eq!(settings.bindings.jump, vec!["w", "arrowup"]);
        assert_eq!(settings.bindings.left, KeyBindings::default().left);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ tuning: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::from_path("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.tuning.coin_reward = 2;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_falls_back_on_missing_file() {
        let settings = Settings::load(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(settings, Settings::default());
    }
}
