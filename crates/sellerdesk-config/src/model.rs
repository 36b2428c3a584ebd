//! Typed client configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT_SECS, default_session_path,
};

/// Requested log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatSetting {
    /// Pick based on the build profile.
    #[default]
    Infer,
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Everything the client needs to reach the API and persist a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base endpoint every request path is joined onto.
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Location of the durable session file.
    pub session_path: PathBuf,
    /// Default tracing level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormatSetting,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is a valid absolute URL"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_path: default_session_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormatSetting::Infer,
        }
    }
}
