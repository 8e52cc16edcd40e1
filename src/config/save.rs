use crate::config::types::{Config, UserSettings};
use crate::tools::write_atomically;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn save_settings(path: &Path, settings: &UserSettings) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    write_atomically(path, |writer| writer.write_all(content.as_bytes()))
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// Remembers the root chosen in this run for the next one.
pub fn set_last_used_dir(settings: &mut UserSettings, path: &Path) {
    settings.last_used_dir = Some(path.to_string_lossy().to_string());
}

impl Config {
    pub fn save(&self) -> Result<()> {
        save_settings(&self.settings_path, &self.settings)
    }
}
