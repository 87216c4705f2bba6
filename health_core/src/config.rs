//! Configuration file support for healthlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/healthlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub trend: TrendConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Fixed body parameters of the person being tracked
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_height_m")]
    pub height_m: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            height_m: default_height_m(),
        }
    }
}

/// Trend chart configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Number of most recent records shown in charts and reports
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("healthlog")
}

fn default_height_m() -> f64 {
    1.73
}

fn default_window() -> usize {
    crate::trend::DEFAULT_WINDOW
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthlog")
            .join("config.toml")
    }

    /// Reject values the evaluator or chart cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.profile.height_m.is_finite() || self.profile.height_m <= 0.0 {
            return Err(Error::Config(format!(
                "profile.height_m must be positive, got {}",
                self.profile.height_m
            )));
        }
        if self.trend.window == 0 {
            return Err(Error::Config("trend.window must be at least 1".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
