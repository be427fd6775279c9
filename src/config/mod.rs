use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::password::{self, PasswordOptions};

/// Password widget defaults (applied at startup, never written back)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDefaults {
    #[serde(default = "default_length")]
    pub length: usize,  // Clamped into 6..=32 when used
    #[serde(default)]
    pub digits: bool,
    #[serde(default = "default_true")]
    pub letters: bool,
    #[serde(default)]
    pub symbols: bool,
}

impl Default for PasswordDefaults {
    fn default() -> Self {
        let options = PasswordOptions::default();
        Self {
            length: options.length,
            digits: options.digits,
            letters: options.letters,
            symbols: options.symbols,
        }
    }
}

impl PasswordDefaults {
    pub fn to_options(&self) -> PasswordOptions {
        PasswordOptions {
            length: password::clamp_length(self.length),
            digits: self.digits,
            letters: self.letters,
            symbols: self.symbols,
        }
    }
}

fn default_length() -> usize {
    password::DEFAULT_LENGTH
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial password length and character classes
    #[serde(default)]
    pub password: PasswordDefaults,

    /// Show desktop notifications after copying
    #[serde(default = "default_true")]
    pub notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            password: PasswordDefaults::default(),
            notifications: true,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("pocketkit");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("{}", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Load config from a file, or write and return defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Failed to read config {}: {}", path.display(), e),
            }
            // Leave a broken file alone so the user can fix it
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Could not create config directory: {}", e);
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
