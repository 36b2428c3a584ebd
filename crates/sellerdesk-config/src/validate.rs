//! Parsing helpers for individual configuration fields.

use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::LogFormatSetting;

/// Parse and check the base endpoint URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` when the value is not an absolute
/// `http`/`https` URL.
pub fn parse_api_url(field: &'static str, value: &str) -> ConfigResult<Url> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::invalid(field, trimmed, "not a URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::invalid(field, trimmed, "scheme must be http or https")),
    }
}

/// Parse a positive number of seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` for non-numeric or zero values.
pub fn parse_timeout(field: &'static str, value: &str) -> ConfigResult<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, value, "must be an integer"))?;
    if secs == 0 {
        return Err(ConfigError::invalid(field, value, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a log format name.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` for names other than `json`, `pretty`
/// or `auto`.
pub fn parse_log_format(field: &'static str, value: &str) -> ConfigResult<LogFormatSetting> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormatSetting::Json),
        "pretty" => Ok(LogFormatSetting::Pretty),
        "" | "auto" => Ok(LogFormatSetting::Infer),
        _ => Err(ConfigError::invalid(field, value, "expected json, pretty or auto")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_rejects_non_http_schemes() {
        assert!(parse_api_url("url", "https://api.example").is_ok());
        assert!(parse_api_url("url", " http://localhost:5000 ").is_ok());
        let err = parse_api_url("url", "ftp://files.example").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField { reason: "scheme must be http or https", .. }
        ));
        assert!(parse_api_url("url", "not a url").is_err());
    }

    #[test]
    fn timeout_requires_positive_integer() {
        assert_eq!(parse_timeout("t", "15").unwrap(), Duration::from_secs(15));
        assert!(parse_timeout("t", "0").is_err());
        assert!(parse_timeout("t", "soon").is_err());
    }

    #[test]
    fn log_format_accepts_known_names() {
        assert_eq!(parse_log_format("f", "JSON").unwrap(), LogFormatSetting::Json);
        assert_eq!(parse_log_format("f", "pretty").unwrap(), LogFormatSetting::Pretty);
        assert_eq!(parse_log_format("f", "auto").unwrap(), LogFormatSetting::Infer);
        assert!(parse_log_format("f", "xml").is_err());
    }
}
