//! Stale-response guard for list views.
//!
//! A view takes a ticket before each request and applies the response only if
//! no newer ticket was issued meanwhile, so a slow first search cannot
//! overwrite the results of a later one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence stamp of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues tickets for one view. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    /// Fresh sequencer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request, superseding every earlier ticket.
    #[must_use]
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(value)` when `ticket` is still current, otherwise `None`.
    #[must_use]
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}
