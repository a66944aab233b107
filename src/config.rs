//! Application configuration persistence
//!
//! Stores user preferences in `~/.config/sumi/config.yaml`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encoding::Eol;
use crate::save::DEFAULT_SIZE_GUARD_RATIO;

/// Configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Prefer UTF-8 whenever the bytes decode cleanly as UTF-8, even if
    /// a legacy encoding is also plausible
    #[serde(default = "default_prefer_utf8")]
    pub prefer_utf8: bool,

    /// Output smaller than this fraction of the file being replaced
    /// triggers a confirmation before saving
    #[serde(default = "default_size_guard_ratio")]
    pub size_guard_ratio: f64,

    /// Line-ending style for new documents
    #[serde(default)]
    pub default_eol: Eol,

    /// Selected theme id (e.g., "paper-light", "ink-dark")
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_prefer_utf8() -> bool {
    true
}

fn default_size_guard_ratio() -> f64 {
    DEFAULT_SIZE_GUARD_RATIO
}

fn default_theme() -> String {
    "paper-light".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefer_utf8: default_prefer_utf8(),
            size_guard_ratio: default_size_guard_ratio(),
            default_eol: Eol::default(),
            theme: default_theme(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or return defaults if missing
    /// or unparseable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
