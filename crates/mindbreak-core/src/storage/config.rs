//! TOML-backed preference storage.
//!
//! Preferences are stored at `~/.config/mindbreak/preferences.toml`. A
//! missing file yields defaults; saving overwrites whole-file
//! (last-write-wins).

use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::preferences::Preferences;

/// Storage for the per-user preference configuration.
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Open the store at the default location.
    pub fn open() -> Result<Self, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/mindbreak"),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: dir.join("preferences.toml"),
        })
    }

    /// Store backed by a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load preferences, falling back to defaults when no file exists.
    pub fn load(&self) -> Result<Preferences, ConfigError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save preferences, overwriting the file.
    pub fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(prefs).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityCategory;

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferencesStore::with_path(dir.path().join("preferences.toml"));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferencesStore::with_path(dir.path().join("preferences.toml"));

        let prefs = Preferences {
            preferred_categories: vec![ActivityCategory::Breathing],
            variety_enabled: false,
            max_daily: 5,
            ..Default::default()
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "max_daily = \"not a number\"").unwrap();

        let store = PreferencesStore::with_path(path);
        assert!(matches!(store.load(), Err(ConfigError::ParseFailed(_))));
    }
}
