//! Board configuration persistence
//!
//! Stores board metrics and drag tuning in `~/.config/board-dnd/config.yaml`

use serde::{Deserialize, Serialize};

/// Board configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Width of one column (and of every card in it)
    pub column_width: f32,
    /// Horizontal gap between columns
    pub column_gap: f32,
    /// Height of the column header above the first card
    pub column_header_height: f32,
    /// Height of one card (the add slot uses the same height)
    pub card_height: f32,
    /// Vertical gap between cards
    pub card_gap: f32,
    /// Height of a swimlane header row
    pub lane_header_height: f32,
    /// Vertical gap between swimlanes
    pub lane_gap: f32,
    /// Extra height added to the dragged card's box during collision
    /// resolution, making the row below easier to hit
    pub card_drop_tolerance: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            column_width: 262.0,
            column_gap: 8.0,
            column_header_height: 40.0,
            card_height: 64.0,
            card_gap: 6.0,
            lane_header_height: 36.0,
            lane_gap: 12.0,
            card_drop_tolerance: 8.0,
        }
    }
}

impl BoardConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse config from YAML; missing fields take their defaults
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
