//! Configuration management for Keyward.

use serde::Deserialize;
use std::path::Path;

use keyward_common::KeywardError;
use keyward_common::constants::{DEFAULT_HTTP_ADDR, DEFAULT_HTTP_TIMEOUT_SECS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Cluster agent HTTP address
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Overall request deadline in seconds; covers the whole fan-out,
    /// no per-pool timeouts are applied
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API token sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,
}

// Default value functions
fn default_http_addr() -> String {
    DEFAULT_HTTP_ADDR.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self, KeywardError> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .map_err(|e| KeywardError::Config(format!("Failed to load config file: {}", e)))?;

            settings
                .try_deserialize()
                .map_err(|e| KeywardError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref http_addr) = args.http_addr {
            config.http_addr = http_addr.clone();
        }
        if let Some(ref token) = args.token {
            config.token = Some(token.clone());
        }
        if let Some(timeout_secs) = args.timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}
