//! Durable key-value storage for the session record.
//!
//! # Design
//! - Backends store the whole `StoredSession` at once; partial writes are
//!   read-modify-write at the handle level.
//! - `clear` is idempotent on every backend.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::StoredSession;

/// Backend capable of persisting a `StoredSession`.
pub trait SessionStore: Send + Sync {
    /// Read the current record; a missing record is an empty session.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` when the backend cannot be read or decoded.
    fn load(&self) -> StoreResult<StoredSession>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` when the backend cannot be written.
    fn save(&self, session: &StoredSession) -> StoreResult<()>;

    /// Remove every stored value.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` when the backend cannot be cleared.
    fn clear(&self) -> StoreResult<()>;
}

/// In-process store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoredSession>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `session`.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> StoreResult<StoredSession> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> StoreResult<()> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = StoredSession::default();
        Ok(())
    }
}

/// JSON file store; writes go to a sibling temp file and are renamed into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `path`. Nothing is touched until the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> StoreResult<StoredSession> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StoredSession::default()),
            Err(err) => return Err(self.io_error("read", err)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StoredSession::default());
        }
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, session: &StoredSession) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error("create_dir", err))?;
        }
        let encoded =
            serde_json::to_vec_pretty(session).map_err(|source| StoreError::Encode { source })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| self.io_error("write", err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error("rename", err))?;
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}
