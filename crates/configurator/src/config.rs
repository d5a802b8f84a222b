//! Application configuration. Loaded from `courtviz.ron` at startup;
//! a missing or invalid file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory court and accessory assets are resolved from.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Preview frame width in pixels.
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    /// Preview frame height in pixels.
    #[serde(default = "default_preview_height")]
    pub preview_height: u32,
    /// Lead endpoint on the relay.
    #[serde(default = "default_relay_endpoint")]
    pub relay_endpoint: String,
    /// Origin presented to the relay's access gate.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Page URL recorded with each lead.
    #[serde(default = "default_page_url")]
    pub page_url: String,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_preview_width() -> u32 {
    1280
}
fn default_preview_height() -> u32 {
    720
}
fn default_relay_endpoint() -> String {
    "https://padel-leads.example.workers.dev/api/lead".to_string()
}
fn default_origin() -> String {
    "https://courts.example.io".to_string()
}
fn default_page_url() -> String {
    "https://courts.example.io/configurator".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
            relay_endpoint: default_relay_endpoint(),
            origin: default_origin(),
            page_url: default_page_url(),
        }
    }
}

impl AppConfig {
    /// Load config from `courtviz.ron` in the current directory.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load from an explicit path. Missing or invalid files yield
    /// defaults with a warning, never an error.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(config) => return config,
                Err(err) => {
                    log::warn!("invalid config at {:?}: {}, using defaults", path, err)
                }
            }
        }
        Self::default()
    }

    /// Save to `courtviz.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(err) = std::fs::write(&path, s) {
                log::warn!("could not write config to {:?}: {}", path, err);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("courtviz.ron")
}
