#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Durable session state for the Sellerdesk client.
//!
//! Layout:
//! - `model.rs`: the persisted session record
//! - `store.rs`: `SessionStore` backends (file, memory)
//! - `handle.rs`: read accessors and the exclusive write interface
//! - `phase.rs`: auth phase state machine and navigation signals
//! - `guard.rs`: route gating on the auth phase

pub mod error;
pub mod guard;
pub mod handle;
pub mod model;
pub mod phase;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use guard::{Route, RouteDecision, RouteGuard};
pub use handle::{SessionHandle, SessionReader};
pub use model::StoredSession;
pub use phase::{AuthPhase, PhaseTransitionError, SessionEvent, SessionState};
pub use store::{FileStore, MemoryStore, SessionStore};
