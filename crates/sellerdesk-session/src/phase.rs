//! Auth phase state machine shared by bootstrap, login and logout.
//!
//! `Uninitialized → Checking → {Authenticated, Unauthenticated}`. Once
//! resolved, the phase only changes through an explicit login or logout.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::info;

const EVENT_CAPACITY: usize = 16;

/// Where the client stands in the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    /// Nothing checked yet.
    Uninitialized,
    /// Stored identity is being validated.
    Checking,
    /// A validated session exists.
    Authenticated,
    /// No usable session.
    Unauthenticated,
}

impl AuthPhase {
    /// Whether bootstrap has finished.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Authenticated | Self::Unauthenticated)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Checking => "checking",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected phase change.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move auth phase from {from} to {to}")]
pub struct PhaseTransitionError {
    /// Phase at the time of the attempt.
    pub from: AuthPhase,
    /// Requested phase.
    pub to: AuthPhase,
}

/// Signals the shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded.
    LoggedIn,
    /// The user logged out.
    LoggedOut,
    /// Storage was cleared because the session could not be recovered.
    ForcedLogout,
}

impl SessionEvent {
    /// Whether the shell must navigate to the login screen.
    #[must_use]
    pub const fn redirects_to_login(self) -> bool {
        matches!(self, Self::LoggedOut | Self::ForcedLogout)
    }
}

struct Inner {
    phase: watch::Sender<AuthPhase>,
    events: broadcast::Sender<SessionEvent>,
}

/// Process-wide auth phase plus a navigation event stream.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Inner>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("phase", &self.phase())
            .finish()
    }
}

impl SessionState {
    /// Fresh state in `Uninitialized`.
    #[must_use]
    pub fn new() -> Self {
        let (phase, _) = watch::channel(AuthPhase::Uninitialized);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner { phase, events }),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        *self.inner.phase.borrow()
    }

    /// Watch phase changes.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<AuthPhase> {
        self.inner.phase.subscribe()
    }

    /// Receive navigation-relevant events.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Wait until bootstrap has resolved and return the outcome.
    pub async fn resolved(&self) -> AuthPhase {
        let mut receiver = self.inner.phase.subscribe();
        match receiver.wait_for(|phase| phase.is_resolved()).await {
            Ok(phase) => *phase,
            Err(_) => self.phase(),
        }
    }

    /// `Uninitialized → Checking`.
    ///
    /// # Errors
    ///
    /// Rejects the change from any other phase.
    pub fn begin_check(&self) -> Result<(), PhaseTransitionError> {
        self.transition(AuthPhase::Checking, |from| from == AuthPhase::Uninitialized)
    }

    /// `Checking → Authenticated | Unauthenticated`.
    ///
    /// # Errors
    ///
    /// Rejects the change unless a check is in progress.
    pub fn finish_check(&self, authenticated: bool) -> Result<(), PhaseTransitionError> {
        let to = if authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        };
        self.transition(to, |from| from == AuthPhase::Checking)
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Rejects logins while bootstrap has not resolved.
    pub fn mark_logged_in(&self) -> Result<(), PhaseTransitionError> {
        self.transition(AuthPhase::Authenticated, AuthPhase::is_resolved)?;
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Move to `Unauthenticated` from any phase and signal a login redirect.
    pub fn mark_logged_out(&self, forced: bool) {
        let previous = self.inner.phase.send_replace(AuthPhase::Unauthenticated);
        if previous != AuthPhase::Unauthenticated {
            info!(from = %previous, to = %AuthPhase::Unauthenticated, forced, "auth phase changed");
        }
        self.emit(if forced {
            SessionEvent::ForcedLogout
        } else {
            SessionEvent::LoggedOut
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; the phase channel still carries the state.
        let _ = self.inner.events.send(event);
    }

    fn transition(
        &self,
        to: AuthPhase,
        allowed: impl FnOnce(AuthPhase) -> bool,
    ) -> Result<(), PhaseTransitionError> {
        let mut rejected = None;
        let mut previous = to;
        self.inner.phase.send_if_modified(|current| {
            if allowed(*current) {
                previous = *current;
                *current = to;
                previous != to
            } else {
                rejected = Some(*current);
                false
            }
        });
        if let Some(from) = rejected {
            return Err(PhaseTransitionError { from, to });
        }
        if previous != to {
            info!(from = %previous, to = %to, "auth phase changed");
        }
        Ok(())
    }
}
