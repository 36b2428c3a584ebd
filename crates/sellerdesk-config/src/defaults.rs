//! Fallback values used when the environment does not override them.

use std::path::PathBuf;

/// Base endpoint used when `SELLERDESK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default tracing level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// File name of the durable session store.
pub const SESSION_FILE_NAME: &str = "session.json";
/// Application directory under the platform config dir.
pub const APP_DIR_NAME: &str = "sellerdesk";

/// Platform location of the session file, falling back to the working directory.
#[must_use]
pub fn default_session_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(SESSION_FILE_NAME),
        |dir| dir.join(APP_DIR_NAME).join(SESSION_FILE_NAME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_path_ends_with_file_name() {
        let path = default_session_path();
        assert!(path.ends_with(SESSION_FILE_NAME));
    }
}
