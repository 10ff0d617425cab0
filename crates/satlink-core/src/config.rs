//! # Configuration System
//!
//! YAML configuration for satlink runs:
//!
//! - Detailed downlink budget (`link`)
//! - Fixed-gain sizing budget (`fixed_gain`)
//! - Onboard buffer and ground-station pass (`buffer`, `pass`)
//! - Logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `SATLINK_CONFIG` environment variable
//! 2. `./satlink.yaml` (current directory)
//! 3. `~/.config/satlink/config.yaml` (user config)
//! 4. `/etc/satlink/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! link:
//!   frequency_hz: 2.245e9
//!   tx_power_w: 20.0
//!   rx_antenna:
//!     diameter_m: 3.7
//!
//! buffer:
//!   capacity_bits: 64.0e9
//!   drain_rate_bps: 1.0e9
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::LinkError;
use crate::fixed_gain::FixedGainLinkConfig;
use crate::link_budget::LinkBudgetConfig;
use crate::logging::LogConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SATLINK_CONFIG";

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("config not found: {0}")]
    NotFound(String),
    /// Failed to read or write configuration file
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse configuration
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A section holds values outside their physical domain
    #[error("invalid config section `{section}`: {source}")]
    Validation {
        section: &'static str,
        #[source]
        source: LinkError,
    },
}

/// Onboard buffer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Buffer capacity in bits.
    pub capacity_bits: f64,
    /// Rate at which the downlink empties the buffer, bits/s.
    pub drain_rate_bps: f64,
    /// Rate at which the payload interface refills the buffer, bits/s.
    pub fill_rate_bps: f64,
    /// Occupancy at the start of the run, bits.
    pub initial_bits: f64,
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Time step in seconds.
    pub step_s: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            // 64 Gb optical terminal buffer
            capacity_bits: 64e9,
            // 1 Gbps optical downlink
            drain_rate_bps: 1e9,
            // payload interface
            fill_rate_bps: 900e6,
            // pass starts with a full buffer
            initial_bits: 64e9,
            duration_s: 8.0 * 60.0,
            step_s: 1.0,
        }
    }
}

/// Ground-station pass planning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Total volume waiting to be downlinked, bits.
    pub data_to_downlink_bits: f64,
    /// Duration of one ground-station pass, seconds.
    pub pass_duration_s: f64,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            data_to_downlink_bits: 1100e9,
            pass_duration_s: 8.0 * 60.0,
        }
    }
}

/// Complete satlink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatlinkConfig {
    /// Configuration version
    pub version: String,
    /// Detailed downlink budget
    pub link: LinkBudgetConfig,
    /// Fixed-gain sizing budget
    pub fixed_gain: FixedGainLinkConfig,
    /// Onboard buffer
    pub buffer: BufferConfig,
    /// Ground-station pass
    pub pass: PassConfig,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for SatlinkConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            link: LinkBudgetConfig::default(),
            fixed_gain: FixedGainLinkConfig::default(),
            buffer: BufferConfig::default(),
            pass: PassConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl SatlinkConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points at {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./satlink.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "satlink") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/satlink/config.yaml"));

        paths
    }

    /// Validate the link budget sections.
    ///
    /// Buffer and pass sections are checked by the simulator that consumes
    /// them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.link
            .validate()
            .map_err(|source| ConfigError::Validation {
                section: "link",
                source,
            })?;
        self.fixed_gain
            .validate()
            .map_err(|source| ConfigError::Validation {
                section: "fixed_gain",
                source,
            })?;
        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        serde_yaml::to_string(&Self::default()).unwrap_or_default()
    }
}
