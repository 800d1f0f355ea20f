//! Config schema - Configuration for carequeue

use serde::{Deserialize, Serialize};

/// Main configuration for carequeue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the visit API (e.g., "http://localhost:5000/api")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout in seconds for each API request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,

    /// Interval between queue refreshes when watching
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u32,

    /// Visits per queue page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_seconds() -> u32 {
    30
}

fn default_poll_interval_seconds() -> u32 {
    30
}

fn default_page_size() -> u32 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
            poll_interval_seconds: default_poll_interval_seconds(),
            page_size: default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.poll_interval_seconds, 30);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_config_partial_json() {
        // Simulate a config file with only some fields set
        let json = r#"{"api_base_url": "https://clinic.example.org/api"}"#;
        let parsed: Config = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.api_base_url, "https://clinic.example.org/api");
        // Other fields should have defaults
        assert_eq!(parsed.poll_interval_seconds, 30);
        assert_eq!(parsed.page_size, 20);
    }
}
