// SPDX-License-Identifier: MPL-2.0
//! This module handles the view's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use media_player_view::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.url = Some("file:///media/clip.mp4".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.url, config.url);
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "MediaPlayerView";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media to load when the view starts.
    pub url: Option<String>,
    /// Seconds between frame-rate log lines while playing. Zero disables them.
    pub frame_rate_log_interval_secs: u32,
    pub layout: LayoutConfig,
    pub colors: ColorConfig,
    pub keys: KeyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            frame_rate_log_interval_secs: DEFAULT_FRAME_RATE_LOG_INTERVAL_SECS,
            layout: LayoutConfig::default(),
            colors: ColorConfig::default(),
            keys: KeyConfig::default(),
        }
    }
}

/// Control-bar metrics in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub margin: f32,
    pub controls_height: f32,
    pub symbol_width: f32,
    pub symbol_height: f32,
    pub symbol_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            controls_height: DEFAULT_CONTROLS_HEIGHT,
            symbol_width: DEFAULT_SYMBOL_WIDTH,
            symbol_height: DEFAULT_SYMBOL_HEIGHT,
            symbol_padding: DEFAULT_SYMBOL_PADDING,
        }
    }
}

/// Overlay colors, each `0xAARRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub background: u32,
    pub controls: u32,
    pub progress_foreground: u32,
    pub progress_background: u32,
    pub symbol: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND_COLOR,
            controls: DEFAULT_CONTROLS_COLOR,
            progress_foreground: DEFAULT_PROGRESS_FOREGROUND_COLOR,
            progress_background: DEFAULT_PROGRESS_BACKGROUND_COLOR,
            symbol: DEFAULT_SYMBOL_COLOR,
        }
    }
}

/// HID usage codes bound to view actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub toggle: u32,
    pub quit: u32,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            toggle: DEFAULT_TOGGLE_KEY,
            quit: DEFAULT_QUIT_KEY,
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a configuration file. Unparseable content yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!("Ignoring invalid config {}: {err}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
