//! Configuration loading and management
//!
//! Handles parsing of optional `tl.toml` configuration files. Every field
//! has a default, so a missing file yields a fully usable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Override for the state file path (defaults to the platform data dir)
    #[serde(default)]
    pub state_path: Option<PathBuf>,

    /// Board defaults
    #[serde(default)]
    pub board: BoardConfig,

    /// Autosave behavior
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: None,
            board: BoardConfig::default(),
            autosave: AutosaveConfig::default(),
        }
    }
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Name given to the seeded board when no prior state exists
    #[serde(default = "default_board_name")]
    pub default_name: String,
}

fn default_board_name() -> String {
    "My Board".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_name: default_board_name(),
        }
    }
}

/// Autosave configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Quiet period before a debounced save fires, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    150
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `tl.toml` from a directory, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = dir.join("tl.toml");
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_default()
    }
}
