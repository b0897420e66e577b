//! # Configuration Management Module
//!
//! TOML-backed configuration for the meshmap CLI and library defaults.
//!
//! ## Configuration Structure
//!
//! - [`StorageConfig`] - node/waypoint directory location
//! - [`MapConfig`] - map engine behavior (scene fetch bounds, preference store path)
//! - [`LoggingConfig`] - logging level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meshmap::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Data dir: {}", config.storage.data_dir);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [storage]
//! data_dir = "./data"
//!
//! [map]
//! scene_fetch_timeout_secs = 10
//!
//! [logging]
//! level = "info"
//! file = "meshmap.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Upper bound on a look-around scene fetch before it degrades to
    /// "unavailable", seconds.
    #[serde(default = "default_scene_fetch_timeout_secs")]
    pub scene_fetch_timeout_secs: u64,
    /// Optional override for the preference store path; defaults to
    /// `<data_dir>/prefs`.
    #[serde(default)]
    pub prefs_db_path: Option<String>,
}

fn default_scene_fetch_timeout_secs() -> u64 {
    10
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            scene_fetch_timeout_secs: default_scene_fetch_timeout_secs(),
            prefs_db_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Effective preference store path: the configured override, or `<data_dir>/prefs`.
    pub fn prefs_db_path(&self) -> String {
        self.map
            .prefs_db_path
            .clone()
            .unwrap_or_else(|| format!("{}/prefs", self.storage.data_dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            map: MapConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("meshmap.log".to_string()),
            },
        }
    }
}
