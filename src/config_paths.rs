//! Centralized configuration paths for board-dnd
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/board-dnd/`
//! - Windows: `%APPDATA%\board-dnd\`
//!
//! This module is the single source of truth for config paths.

use std::{env, fs, path::PathBuf};

const APP_DIR: &str = "board-dnd";

/// Base config directory for board-dnd
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/board-dnd`
///   - Else: `~/.config/board-dnd`
///
/// Windows:
///   - `%APPDATA%\board-dnd`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/board-dnd/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/board-dnd/view-settings.json` (sub-group order and hidden sets)
pub fn view_settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("view-settings.json"))
}

/// `~/.config/board-dnd/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs dir (and the config dir above it), returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
