//! Environment-driven configuration loading.
//!
//! # Design
//! - Loading is a pure function over a key lookup so tests never mutate the
//!   process environment.
//! - Unset or blank variables fall back to `defaults.rs`.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigResult;
use crate::model::ClientConfig;
use crate::validate::{parse_api_url, parse_log_format, parse_timeout};

/// Base endpoint override.
pub const ENV_API_URL: &str = "SELLERDESK_API_URL";
/// Request timeout override in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SELLERDESK_HTTP_TIMEOUT_SECS";
/// Session file override.
pub const ENV_SESSION_PATH: &str = "SELLERDESK_SESSION_PATH";
/// Default log level override.
pub const ENV_LOG_LEVEL: &str = "SELLERDESK_LOG_LEVEL";
/// Log format override.
pub const ENV_LOG_FORMAT: &str = "SELLERDESK_LOG_FORMAT";

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a variable is present but invalid.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_API_URL) {
            config.api_url = parse_api_url(ENV_API_URL, &value)?;
        } else {
            debug!(api_url = %config.api_url, "API URL not configured; using default");
        }
        if let Some(value) = get(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = get(ENV_SESSION_PATH) {
            config.session_path = PathBuf::from(value.trim());
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            config.log_level = value.trim().to_string();
        }
        if let Some(value) = get(ENV_LOG_FORMAT) {
            config.log_format = parse_log_format(ENV_LOG_FORMAT, &value)?;
        }

        Ok(config)
    }
}
