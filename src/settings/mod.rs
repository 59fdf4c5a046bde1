//! Voice capture settings
//!
//! Stored as a small JSON document next to the other app data. Every field has
//! a default, so older or hand-edited files with missing keys still load.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "kolki";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceSettings {
    /// Persist recognized expenses without asking
    pub auto_save: bool,
    /// Stored preference for the recognizer session; not read by `VoiceCapture`
    pub auto_save_delay_ms: u32,
    /// Keep unparseable phrases as zero-amount voice notes
    pub fallback_save_raw: bool,
    /// Stored preference for the recognizer session
    pub max_listen_ms: u32,
    pub currency_symbol: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_delay_ms: 800,
            fallback_save_raw: true,
            max_listen_ms: 12_000,
            currency_symbol: "S/".to_string(),
        }
    }
}

impl VoiceSettings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to encode settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

/// `<config dir>/kolki/settings.json`
pub fn default_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = VoiceSettings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, VoiceSettings::default());
        assert!(settings.auto_save);
        assert!(settings.fallback_save_raw);
        assert_eq!(settings.currency_symbol, "S/");
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"fallbackSaveRaw": false, "currencySymbol": "$"}"#).unwrap();

        let settings = VoiceSettings::load(&path).unwrap();
        assert!(!settings.fallback_save_raw);
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.auto_save);
        assert_eq!(settings.auto_save_delay_ms, 800);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = VoiceSettings {
            auto_save: false,
            max_listen_ms: 8_000,
            ..VoiceSettings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(VoiceSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = VoiceSettings::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid settings file"));
    }
}
