//! User configuration file handling
//!
//! Manages settings from ~/.config/layers2font/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration from ~/.config/layers2font/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Diagnostic log location (defaults to the temp directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// stderr log filter, e.g. "layers2font=debug"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl ConfigFile {
    /// Get the path to the layers2font config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("layers2font")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, warning about unreadable ones
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save configuration to a file, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Create the config directory with a settings.json holding the defaults
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        Self::initialize_in(&Self::config_dir())
    }

    fn initialize_in(config_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let settings_path = config_dir.join("settings.json");
        if !settings_path.exists() {
            let example = ConfigFile {
                log_file: Some(crate::logging::default_log_file()),
                log_filter: Some(crate::logging::DEFAULT_FILTER.to_string()),
            };
            example.save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        Ok(())
    }
}
