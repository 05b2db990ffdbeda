//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the surf-config.toml file.
//! It provides a centralized way to configure the forecast service endpoint and the
//! command line output.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "surf-config.toml";

/// Application configuration loaded from surf-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Forecast service configuration
    pub source: SourceConfig,
    /// Command line output configuration
    pub display: DisplayConfig,
}

/// Forecast service configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// URL returning the forecast JSON document
    pub url: String,
    /// Human-readable spot name for log output
    pub spot_name: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Command line output configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Number of forecast days to print (at most 8)
    pub days: usize,
    /// Print the hourly records under each day summary
    pub show_hourly: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig {
                url: "https://rhodycast.appspot.com/forecast_as_json".to_string(),
                spot_name: "Rhode Island".to_string(),
                request_timeout_secs: 30,
            },
            display: DisplayConfig {
                days: 5,
                show_hourly: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from surf-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!(spot = %config.source.spot_name, "loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!("invalid config file format: {}", e);
                    tracing::warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        tracing::info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
