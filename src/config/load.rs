use crate::config::types::{Config, DEFAULT_SETTINGS_FILE, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    pub fn new() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_SETTINGS_FILE))
    }

    /// A missing file yields defaults; a malformed one is reported and replaced by defaults.
    pub fn load_from(settings_path: &Path) -> Result<Self> {
        let settings = match Self::load_settings(settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings: {e:#}");
                UserSettings::default()
            }
        };

        Ok(Self {
            settings,
            settings_path: PathBuf::from(settings_path),
        })
    }

    fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: UserSettings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(config.settings, UserSettings::default());
    }

    #[test]
    fn test_load_invalid_settings_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"grid":{"rows":0,"cols":0}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings, UserSettings::default());
    }
}
