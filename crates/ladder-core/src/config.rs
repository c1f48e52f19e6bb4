//! Ladder configuration.
//!
//! Configuration lives in `~/.config/ladder/config.toml` unless
//! `LADDER_CONFIG` points elsewhere. Every section is optional and falls
//! back to the built-in defaults.
//!
//! ```toml
//! [leveling]
//! xp_per_level = 500
//! top_title = "LLM Luminary"
//!
//! [streak]
//! milestones = [7, 30, 100]
//!
//! [[badges]]
//! id = "first_lesson"
//! symbol = "[1]"
//! name = "First Prompt"
//! description = "Complete your first lesson"
//! rule = { kind = "min_lessons", lessons = 1 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::badges::BadgeCatalog;
use crate::error::{LadderError, Result};
use crate::level::LevelTable;
use crate::streak::StreakPolicy;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "LADDER_CONFIG";
const CONFIG_DIR: &str = "ladder";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderConfig {
    #[serde(default)]
    pub leveling: LevelTable,

    #[serde(default)]
    pub streak: StreakPolicy,

    #[serde(default)]
    pub badges: BadgeCatalog,
}

impl LadderConfig {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable config, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate a specific config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.leveling.validate()?;
        self.streak.validate()?;
        self.badges.validate()
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LadderError::Config(e.to_string()))
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}
