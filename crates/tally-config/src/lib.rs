//! Configuration management for tally
//!
//! This module handles loading, validation, and management of
//! tally configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Ledger input and report output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the per-account CSV ledgers
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory the reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./out")
}

/// Report generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Number of decimal places in the value column
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Per-job timeout in seconds (none by default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            timeout_secs: None,
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Input/output directories
    #[serde(default)]
    pub data: DataConfig,
    /// Report generation settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // A document with nothing but comments deserializes to null
        let has_values = content
            .lines()
            .map(str::trim)
            .any(|line| !line.is_empty() && !line.starts_with('#') && line != "---");
        if !has_values {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.input_dir".to_string(),
                reason: "Input directory must not be empty".to_string(),
            });
        }

        if self.data.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.output_dir".to_string(),
                reason: "Output directory must not be empty".to_string(),
            });
        }

        if self.reports.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "reports.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.reports.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "reports.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the trigger API listens on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================
