//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Message-rate filter configuration.
///
/// Values are wired in when the registry and tracker are constructed and
/// never change afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Trailing window over which message counts are evaluated, in
    /// milliseconds (default: 7000).
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
    /// Message count at or above which a message is filtered (default: 3).
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
    /// Minimum interval between warnings to the same author, in milliseconds
    /// (default: 8000).
    #[serde(default = "default_warning_cooldown_ms")]
    pub warning_cooldown_ms: i64,
    /// How long a warning message stays up before it is taken down again, in
    /// seconds (default: 5).
    #[serde(default = "default_warning_ttl_secs")]
    pub warning_ttl_secs: u64,
    /// Maximum number of autocomplete suggestions returned to the gateway
    /// (default: 25, the platform cap).
    #[serde(default = "default_max_choices")]
    pub max_choices: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            message_limit: default_message_limit(),
            warning_cooldown_ms: default_warning_cooldown_ms(),
            warning_ttl_secs: default_warning_ttl_secs(),
            max_choices: default_max_choices(),
        }
    }
}

impl FilterConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: FilterConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

fn default_window_ms() -> i64 {
    7000
}

fn default_message_limit() -> usize {
    3
}

fn default_warning_cooldown_ms() -> i64 {
    8000
}

fn default_warning_ttl_secs() -> u64 {
    5
}

fn default_max_choices() -> usize {
    25
}
