//! Core configuration types.

use crate::console::DEFAULT_MODULE_NAME;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Module and storage settings.
    pub console: ConsoleConfig,
    /// The principal the stdin console acts as.
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Query name of the global scope, without the status prefix.
    #[serde(default = "default_module_name")]
    pub module_name: String,
    /// Bouncer object model file (users, networks, channels).
    pub bouncer_config: PathBuf,
    /// Persisted console settings; kept in memory when absent.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_module_name() -> String {
    DEFAULT_MODULE_NAME.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub user: String,
    /// Network the session is attached to.
    #[serde(default)]
    pub network: Option<String>,
}
