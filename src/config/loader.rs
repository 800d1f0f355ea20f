//! Configuration loading with defaults

use std::path::Path;

use crate::errors::{CareQueueError, Result};
use crate::fs;
use crate::schemas::Config;

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "CAREQUEUE_API_URL";

/// Load configuration from the home directory, falling back to defaults.
///
/// If config.json exists, it will be read and merged with defaults.
/// `CAREQUEUE_API_URL`, when set, replaces the API base URL.
///
/// # Arguments
/// * `home` - Path to the carequeue home directory
///
/// # Returns
/// The resolved, validated configuration
pub fn load_config(home: &Path) -> Result<Config> {
    let config = fs::read_config(home)?;
    let api_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());
    let config = apply_overrides(config, api_url);
    validate_config(&config)?;
    tracing::debug!(api = %config.api_base_url, "Loaded configuration");
    Ok(config)
}

/// Apply environment overrides to a loaded config.
pub fn apply_overrides(mut config: Config, api_url: Option<String>) -> Config {
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
    config
}

/// Reject configurations the client cannot work with.
pub fn validate_config(config: &Config) -> Result<()> {
    if !(config.api_base_url.starts_with("http://") || config.api_base_url.starts_with("https://"))
    {
        return Err(CareQueueError::ConfigError(format!(
            "api_base_url must be an http(s) URL, got '{}'",
            config.api_base_url
        )));
    }
    if config.timeout_seconds == 0 {
        return Err(CareQueueError::ConfigError(
            "timeout_seconds must be at least 1".to_string(),
        ));
    }
    if config.poll_interval_seconds == 0 {
        return Err(CareQueueError::ConfigError(
            "poll_interval_seconds must be at least 1".to_string(),
        ));
    }
    if config.page_size == 0 || config.page_size > 100 {
        return Err(CareQueueError::ConfigError(format!(
            "page_size must be between 1 and 100, got {}",
            config.page_size
        )));
    }
    Ok(())
}
