//! Pre-seeded session stores.

use std::sync::Arc;

use sellerdesk_session::{FileStore, MemoryStore, SessionHandle, StoredSession};
use tempfile::TempDir;
use serde_json::json;

/// Handle over an in-memory store holding `uid`, `token` and `refresh_token`.
#[must_use]
pub fn seeded_handle(uid: &str, token: &str, refresh_token: Option<&str>) -> SessionHandle {
    let session = StoredSession {
        uid: Some(uid.to_string()),
        token: Some(token.to_string()),
        refresh_token: refresh_token.map(str::to_string),
        user_info: Some(json!({"name": "tester", "email": "tester@example.com"})),
    };
    SessionHandle::new(Arc::new(MemoryStore::with_session(session)))
}

/// Handle over an empty in-memory store.
#[must_use]
pub fn empty_handle() -> SessionHandle {
    SessionHandle::new(Arc::new(MemoryStore::default()))
}

/// File-backed handle inside a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the handle is used.
///
/// # Panics
///
/// Panics when the temporary directory cannot be created.
#[must_use]
pub fn temp_file_handle() -> (TempDir, SessionHandle) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileStore::new(dir.path().join("session.json"));
    (dir, SessionHandle::new(Arc::new(store)))
}
