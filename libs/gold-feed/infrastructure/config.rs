//! Feed configuration loaded from YAML with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::cache::DEFAULT_TTL_HOURS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Upstream API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Aggregating bridge endpoint; tried before the direct API when set
    #[serde(default)]
    pub bridge_url: Option<String>,

    /// Polling cadence in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Durable cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_hours: i64,

    /// Directory for persisted client state
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// API key from .env (not in YAML)
    #[serde(skip)]
    pub api_key: String,
}

fn default_api_base_url() -> String {
    collect_client::DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    60
}

fn default_cache_ttl() -> i64 {
    DEFAULT_TTL_HOURS
}

fn default_state_dir() -> String {
    ".gold-feed".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bridge_url: None,
            poll_interval_secs: default_poll_interval(),
            cache_ttl_hours: default_cache_ttl(),
            state_dir: default_state_dir(),
            log_level: default_log_level(),
            api_key: String::new(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a YAML file, pulling the API key from
    /// the environment (`COLLECT_API_KEY`, `.env` supported).
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: FeedConfig = serde_yaml::from_str(&yaml_content)?;

        config.api_key = std::env::var("COLLECT_API_KEY")
            .map_err(|_| ConfigError::EnvVarMissing("COLLECT_API_KEY".to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "cache_ttl_hours must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  API base URL: {}", self.api_base_url);
        if let Some(bridge) = &self.bridge_url {
            info!("  Bridge URL: {}", bridge);
        }
        info!("  Poll interval: {} seconds", self.poll_interval_secs);
        info!("  Cache TTL: {} hours", self.cache_ttl_hours);
        info!("  State dir: {}", self.state_dir);
        info!("  Log level: {}", self.log_level);
    }
}
