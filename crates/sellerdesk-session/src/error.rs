//! Error types for durable session storage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by `SessionStore` backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("session storage {operation} failed for {path}")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The stored document could not be decoded.
    #[error("session file {path} is not valid JSON")]
    Decode {
        /// File involved.
        path: PathBuf,
        /// Source decode error.
        source: serde_json::Error,
    },
    /// The session could not be encoded.
    #[error("failed to encode session")]
    Encode {
        /// Source encode error.
        source: serde_json::Error,
    },
}
