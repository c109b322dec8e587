//! Player settings and preferences
//!
//! Persisted as a small JSON file next to the binary. Loading never
//! fails the game: anything unreadable falls back to defaults with a
//! log line, and saving is best-effort.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Last player name entered; offered as the prompt default
    pub player_name: Option<String>,
    /// Fixed session seed; set to replay an exact obstacle sequence
    pub seed: Option<u64>,
    /// Show the FPS counter in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,
            seed: None,
            show_fps: true,
        }
    }
}

impl Settings {
    /// Settings file, relative to the working directory
    const FILE: &'static str = "gapwing-settings.json";

    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE))
    }

    pub fn save(&self) {
        self.save_to(Path::new(Self::FILE));
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("ignoring malformed settings file: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("could not save settings: {err}");
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load_from(Path::new("does-not-exist.json"));
        assert!(settings.player_name.is_none());
        assert!(settings.seed.is_none());
        assert!(settings.show_fps);
    }

    #[test]
    fn settings_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("gapwing-settings-test.json");

        let settings = Settings {
            player_name: Some("ada".into()),
            seed: Some(0xdead_beef),
            show_fps: false,
        };
        settings.save_to(&path);

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.player_name.as_deref(), Some("ada"));
        assert_eq!(loaded.seed, Some(0xdead_beef));
        assert!(!loaded.show_fps);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("gapwing-settings-bad.json");
        fs::write(&path, "{not json").unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.player_name.is_none());

        let _ = fs::remove_file(&path);
    }
}
