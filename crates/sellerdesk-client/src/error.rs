//! # Design
//!
//! - One error type for every call made through the wrapper.
//! - Variants follow what the caller can do about the failure: fix input,
//!   retry later, log in again, or report a server problem.
//! - `user_message` is the text a shell shows; `Display` stays terse.

use std::io;
use std::path::PathBuf;

use sellerdesk_session::{PhaseTransitionError, StoreError};
use thiserror::Error;

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input was missing; no request was sent.
    #[error("invalid input: {message}")]
    Validation {
        /// What is wrong with the input.
        message: String,
    },
    /// The request never produced a response.
    #[error("request failed to reach the server")]
    Network {
        /// Operation identifier.
        operation: &'static str,
        /// Source transport error.
        source: reqwest::Error,
    },
    /// The server rejected the session and it could not be renewed.
    #[error("not authorized")]
    Auth {
        /// Server-supplied or generic reason.
        message: String,
    },
    /// Non-success response.
    #[error("server returned status {status}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-supplied or generic reason.
        message: String,
    },
    /// Response decoded but lacked an expected field.
    #[error("unexpected response shape")]
    DataShape {
        /// Operation identifier.
        operation: &'static str,
        /// What was missing or malformed.
        detail: String,
    },
    /// Login was rejected.
    #[error("invalid credentials")]
    InvalidCredentials {
        /// Server-supplied or generic reason.
        message: String,
    },
    /// Durable session storage failed.
    #[error("session storage failed")]
    Storage {
        /// Source storage error.
        #[from]
        source: StoreError,
    },
    /// The auth phase rejected a transition.
    #[error("session state transition rejected")]
    Phase {
        /// Source transition error.
        #[from]
        source: PhaseTransitionError,
    },
    /// Writing a downloaded file failed.
    #[error("file write failed")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn data_shape(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::DataShape {
            operation,
            detail: detail.into(),
        }
    }

    /// Message suitable for showing to a user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Auth { message }
            | Self::Server { message, .. }
            | Self::InvalidCredentials { message } => message.clone(),
            Self::Network { operation, .. } => {
                format!("could not reach the server ({operation}); check the connection and retry")
            }
            Self::DataShape { operation, detail } => {
                format!("unexpected response from {operation}: {detail}")
            }
            Self::Storage { source } => format!("saved session is unavailable: {source}"),
            Self::Phase { .. } => "session check is still in progress; retry shortly".to_string(),
            Self::Io { path, source } => format!("could not write {}: {source}", path.display()),
        }
    }

    /// Whether the user has to log in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}
