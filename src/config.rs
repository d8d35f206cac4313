//! Configuration loading and management for anew.
//!
//! Loads settings from `anew.toml` with environment variable overrides. Every key
//! is optional, so running without a config file talks to a local backend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "ANEW_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid base url: {0:?}")]
    InvalidBaseUrl(String),
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the summary backend, without the `/api` prefix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// What the home page shows around the topic cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Outlets the summaries are drawn from, shown in the source box
    pub sources: Vec<String>,
    /// Show the one-line service introduction above the title
    pub intro: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location (anew.toml in cwd or home).
    ///
    /// Falls back to defaults when no config file exists anywhere.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Self::from_env(),
        }
    }

    /// Defaults plus environment overrides, for when there is no config file
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Replace the backend base URL, e.g. from a command-line flag
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        self.api.base_url = normalize_base_url(url)?;
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.set_base_url(&url)?;
        } else {
            self.api.base_url = normalize_base_url(&self.api.base_url)?;
        }
        Ok(())
    }

    /// Find the config file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("anew.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("anew").join("anew.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Trim whitespace and trailing slashes so routes can be appended verbatim.
fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(url.to_string()));
    }
    Ok(trimmed.to_string())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sources: [
                "Maeil Business",
                "Korea Economic Daily",
                "Seoul Economic Daily",
                "Money Today",
                "Edaily",
                "Bizwatch",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            intro: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
