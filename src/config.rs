//! Runtime configuration.
//!
//! Read from an optional TOML file. Every field has a default, so a partial
//! file is fine, and a missing or broken file falls back to defaults with a
//! warning rather than stopping the game.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::INVENTORY_DEFAULT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World seed; a random one is drawn when absent
    pub seed: Option<u64>,
    pub save_dir: PathBuf,
    pub asset_dir: PathBuf,
    pub target_fps: u32,
    /// Used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Distinct inventory slots
    pub inventory_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            save_dir: PathBuf::from("saves"),
            asset_dir: PathBuf::from("assets"),
            target_fps: 60,
            log_filter: "info".to_string(),
            inventory_capacity: INVENTORY_DEFAULT_CAPACITY,
        }
    }
}

impl GameConfig {
    /// Load `path`, or defaults if it cannot be read or parsed
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Config {} unreadable ({}); using defaults", path.display(), err);
                return Self::default();
            }
        };
        match toml::from_str::<GameConfig>(&text) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                tracing::warn!("Config {} invalid ({}); using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Milliseconds per simulation frame
    pub fn frame_ms(&self) -> u64 {
        (1000 / self.target_fps.max(1)).max(1) as u64
    }

    fn sanitized(mut self) -> Self {
        if self.target_fps == 0 {
            tracing::warn!("target_fps = 0 is not allowed; using 60");
            self.target_fps = 60;
        }
        if self.inventory_capacity == 0 {
            tracing::warn!("inventory_capacity = 0 is not allowed; using {}", INVENTORY_DEFAULT_CAPACITY);
            self.inventory_capacity = INVENTORY_DEFAULT_CAPACITY;
        }
        self
    }
}
