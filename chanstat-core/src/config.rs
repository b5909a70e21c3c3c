//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chanstat/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chanstat/` (~/.config/chanstat/)
//! - State/Logs: `$XDG_STATE_HOME/chanstat/` (~/.local/state/chanstat/)

use crate::analytics::SortStrategy;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the user report; command-line flags override them.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Ranking strategy name (messages, characters, verbosity)
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Maximum number of rows to show
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Canonical names always excluded
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort: default_sort(),
            limit: default_limit(),
            exclude: vec![],
        }
    }
}

impl ReportConfig {
    /// The configured strategy; unknown names rank by messages.
    pub fn strategy(&self) -> SortStrategy {
        SortStrategy::from_name(&self.sort)
    }
}

/// Check the effective row limit and convert it for slicing.
///
/// Runs on the limit left after command-line overrides.
pub fn validate_limit(limit: i64) -> Result<usize> {
    if limit <= 0 {
        return Err(Error::Config(format!("limit must be positive, got {}", limit)));
    }
    usize::try_from(limit).map_err(|_| Error::Config(format!("limit too large: {}", limit)))
}

fn default_sort() -> String {
    SortStrategy::default().as_str().to_string()
}

fn default_limit() -> i64 {
    20
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chanstat/config.toml` (~/.config/chanstat/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chanstat").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chanstat/` (~/.local/state/chanstat/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chanstat")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/chanstat/chanstat.log` (~/.local/state/chanstat/chanstat.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("chanstat.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
