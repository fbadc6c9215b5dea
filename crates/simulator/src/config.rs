//! Simulator configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub tree: TreeConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("config.toml");
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No config.toml found, creating default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            tree: TreeConfig::default(),
        }
    }
}

/// Board geometry settings. The board is a square with its origin at (0, 0).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Side length of the board.
    #[serde(default = "default_board_size")]
    pub size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
        }
    }
}

fn default_board_size() -> f64 {
    512.0
}

/// Quad tree settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Node capacity: how many points a region holds before it subdivides.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    1
}
