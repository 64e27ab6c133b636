/// Persisted application settings
///
/// Only durable preferences live here (currently the last-used library
/// folder); review state itself is deliberately session-only. Stored
/// as JSON in the user's data directory:
/// - Linux: ~/.local/share/photo-triage/settings.json
/// - macOS: ~/Library/Application Support/photo-triage/settings.json
/// - Windows: %APPDATA%\photo-triage\settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Folder the last review session was loaded from
    pub library_folder: Option<PathBuf>,
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any
    /// missing or unreadable file.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Settings::default();
        };
        std::fs::read_to_string(path)
            .ok()
            .and_then(|json| Settings::from_json(&json).ok())
            .unwrap_or_default()
    }

    /// Write settings to disk. Failures are reported but not fatal;
    /// the app just forgets the folder next launch.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("⚠️  Could not create settings directory: {}", e);
                return;
            }
        }
        match self.to_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    eprintln!("⚠️  Could not save settings: {}", e);
                }
            }
            Err(e) => eprintln!("⚠️  Could not serialize settings: {}", e),
        }
    }

    fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("photo-triage");
        path.push("settings.json");
        Some(path)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_round_trip() {
        let settings = Settings {
            library_folder: Some(PathBuf::from("/photos/2024")),
        };

        let json = settings.to_json().unwrap();
        let restored = Settings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_default_has_no_folder() {
        assert!(Settings::default().library_folder.is_none());
    }

    #[test]
    fn test_garbage_json_is_an_error() {
        assert!(Settings::from_json("not json").is_err());
    }
}
