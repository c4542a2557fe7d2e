use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::DEFAULT_CAPACITY;

/// Environment variable the binary reads the config path from
pub const CONFIG_ENV_VAR: &str = "DRAWING_BOARD_CONFIG";

/// Startup settings for the drawing board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing keys fall back to the defaults below
pub struct BoardConfig {
    /// Canvas viewport width in pixels
    pub width: u32,
    /// Canvas viewport height in pixels
    pub height: u32,
    /// Snapshots kept for undo/redo
    pub history_capacity: usize,
    pub primary_color: Color32,
    pub secondary_color: Color32,
    pub pen_width: u32,
    /// Widths offered as one-click presets
    pub pen_width_presets: Vec<u32>,
    pub default_save_format: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            history_capacity: DEFAULT_CAPACITY,
            primary_color: Color32::BLACK,
            secondary_color: Color32::WHITE,
            pen_width: 1,
            pen_width_presets: vec![1, 2, 4, 6, 8],
            default_save_format: "png".to_owned(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset
    /// or unusable
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_owned(),
            ));
        }
        if self.pen_width == 0 || self.pen_width_presets.contains(&0) {
            return Err(ConfigError::Invalid(
                "pen widths must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
