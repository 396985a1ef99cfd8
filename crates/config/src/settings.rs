// Application settings
// Loaded from ~/.config/celledit/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading or writing a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Behaviour of an in-place edit session.
///
/// Every switch defaults to on. Turning one off removes that cancellation
/// source (or relocation) from new sessions; open sessions are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    /// Move row-spanning cells to the last rendered row while editing
    #[serde(rename = "edit.relocateSpanningCells")]
    pub relocate_spanning_cells: bool,

    /// Cancel when the edited cell loses (or changes) selection
    #[serde(rename = "edit.cancelOnDeselect")]
    pub cancel_on_deselect: bool,

    /// Cancel when the vertical scroll bar moves
    #[serde(rename = "edit.cancelOnScroll")]
    pub cancel_on_scroll: bool,

    /// Cancel when the host component is disabled or re-enabled
    #[serde(rename = "edit.cancelOnDisable")]
    pub cancel_on_disable: bool,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            relocate_spanning_cells: true,
            cancel_on_deselect: true,
            cancel_on_scroll: true,
            cancel_on_disable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Editing
    #[serde(flatten)]
    pub edit: EditSettings,

    // Logging filter used when RUST_LOG is not set
    #[serde(rename = "log.level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            edit: EditSettings::default(),
            log_level: "warn".to_string(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Edit sessions
    "edit.relocateSpanningCells": true,
    "edit.cancelOnDeselect": true,
    "edit.cancelOnScroll": true,
    "edit.cancelOnDisable": true,

    // Logging (overridden by RUST_LOG)
    "log.level": "warn"
}
"#;

/// Strip comment lines (lines starting with //)
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("celledit");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&strip_comments(&contents)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(io_err)
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_parses_to_defaults() {
        let parsed: Settings = serde_json::from_str(&strip_comments(DEFAULT_FILE)).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n  // only scrolling\n  \"edit.cancelOnScroll\": false\n}\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(!settings.edit.cancel_on_scroll);
        assert!(settings.edit.cancel_on_deselect);
        assert!(settings.edit.cancel_on_disable);
        assert!(settings.edit.relocate_spanning_cells);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ \"edit.cancelOnScroll\": nope }").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.edit.relocate_spanning_cells = false;
        settings.log_level = "debug".to_string();

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }
}
