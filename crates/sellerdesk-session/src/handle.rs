//! Read accessors and the exclusive write interface over a `SessionStore`.
//!
//! # Design
//! - `SessionReader` is what views and request decoration receive; it cannot
//!   mutate storage.
//! - `SessionHandle` is held only by the session manager and the HTTP
//!   wrapper's 401 recovery path.
//! - Read failures degrade to "nothing stored" and are logged, so a damaged
//!   session file behaves like a logged-out client.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::StoreResult;
use crate::model::{StoredSession, non_blank};
use crate::store::SessionStore;

/// Read-only view over the durable session.
#[derive(Clone)]
pub struct SessionReader {
    store: Arc<dyn SessionStore>,
}

impl SessionReader {
    /// Full stored record.
    ///
    /// # Errors
    ///
    /// Propagates backend read failures.
    pub fn snapshot(&self) -> StoreResult<StoredSession> {
        self.store.load()
    }

    fn snapshot_or_empty(&self) -> StoredSession {
        self.store.load().unwrap_or_else(|err| {
            warn!(error = %err, "session storage unreadable; treating as empty");
            StoredSession::default()
        })
    }

    /// Stored user id, ignoring blank values.
    #[must_use]
    pub fn uid(&self) -> Option<String> {
        let session = self.snapshot_or_empty();
        non_blank(session.uid.as_deref()).map(str::to_string)
    }

    /// Stored access token, ignoring blank values.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let session = self.snapshot_or_empty();
        non_blank(session.token.as_deref()).map(str::to_string)
    }

    /// Stored refresh token, ignoring blank values.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        let session = self.snapshot_or_empty();
        non_blank(session.refresh_token.as_deref()).map(str::to_string)
    }

    /// Cached profile snapshot.
    #[must_use]
    pub fn profile(&self) -> Option<Value> {
        self.snapshot_or_empty().user_info
    }
}

impl std::fmt::Debug for SessionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReader").finish_non_exhaustive()
    }
}

/// Writer over the durable session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    reader: SessionReader,
}

impl SessionHandle {
    /// Wrap a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            reader: SessionReader { store },
        }
    }

    /// Read-only view to hand to other components.
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        self.reader.clone()
    }

    fn update(&self, apply: impl FnOnce(&mut StoredSession)) -> StoreResult<()> {
        let mut session = self.reader.snapshot_or_empty();
        apply(&mut session);
        self.reader.store.save(&session)
    }

    /// Record a successful login. Absent optional values leave existing
    /// entries untouched unless the stored session belongs to another uid.
    ///
    /// # Errors
    ///
    /// Propagates backend write failures.
    pub fn persist_login(
        &self,
        uid: &str,
        token: Option<String>,
        refresh_token: Option<String>,
        profile: Option<Value>,
    ) -> StoreResult<()> {
        self.update(|session| {
            if session.uid.as_deref() != Some(uid) {
                *session = StoredSession::default();
            }
            session.uid = Some(uid.to_string());
            if token.is_some() {
                session.token = token;
            }
            if refresh_token.is_some() {
                session.refresh_token = refresh_token;
            }
            if profile.is_some() {
                session.user_info = profile;
            }
        })
    }

    /// Replace the access token after a refresh.
    ///
    /// # Errors
    ///
    /// Propagates backend write failures.
    pub fn set_token(&self, token: &str) -> StoreResult<()> {
        self.update(|session| session.token = Some(token.to_string()))
    }

    /// Replace the cached profile.
    ///
    /// # Errors
    ///
    /// Propagates backend write failures.
    pub fn set_profile(&self, profile: Value) -> StoreResult<()> {
        self.update(|session| session.user_info = Some(profile))
    }

    /// Remove every stored value.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn clear(&self) -> StoreResult<()> {
        self.reader.store.clear()
    }
}
