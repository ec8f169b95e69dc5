//! Application configuration.
//!
//! Configuration is assembled from, in increasing precedence:
//! - Built-in defaults
//! - Environment variables
//! - A YAML config file (`PAGECHUNK_CONFIG` or an explicit path)
//! - Explicit overrides supplied by the embedding application
//!
//! The `chunking:` section of the YAML file is kept as raw YAML here and
//! decoded by the chunking crate, so this crate stays free of chunking types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::{LogFormat, LogSettings};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Raw `chunking:` section of the config file
    pub chunking: Option<serde_yaml::Value>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    logging: Option<LoggingConfig>,
    chunking: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingConfig {
    level: Option<String>,
    format: Option<LogFormat>,
    color: Option<bool>,
}

impl AppConfig {
    /// Load configuration from environment variables and the config file.
    ///
    /// Environment variables:
    /// - `PAGECHUNK_CONFIG`: Path to a YAML config file
    /// - `PAGECHUNK_LOG_FORMAT`: `pretty` or `json`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use pagechunk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Config file: {:?}", config.config_file);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if let Ok(format) = std::env::var("PAGECHUNK_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        if std::env::var_os("NO_COLOR").is_some() {
            config.no_color = true;
        }

        if let Ok(config_file) = std::env::var("PAGECHUNK_CONFIG") {
            let path = PathBuf::from(config_file);
            if !path.exists() {
                return Err(AppError::Configuration(format!(
                    "Config file named by PAGECHUNK_CONFIG does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
        }

        Ok(config)
    }

    /// Load configuration from an explicit YAML file, ignoring `PAGECHUNK_CONFIG`.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        Self::default().merge_yaml(path)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Configuration(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(chunking) = config_file.chunking {
            result.chunking = Some(chunking);
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply explicit overrides, which take precedence over env and file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(config_file) = config_file {
            self = self.merge_yaml(&config_file)?;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Logging settings derived from this config.
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            format: self.log_format,
            no_color: self.no_color,
        }
    }
}
