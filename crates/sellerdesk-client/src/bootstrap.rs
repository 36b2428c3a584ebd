//! Startup sequencing.
//!
//! `Uninitialized → Checking → Authenticated | Unauthenticated`, driven once
//! per process. The connectivity probe runs beside the check on its own task
//! and only logs.

use sellerdesk_api_models::Confirmation;
use sellerdesk_session::AuthPhase;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::SessionManager;
use crate::endpoints;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::request::ApiRequest;

/// Runs the startup session check.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    api: ApiClient,
    manager: SessionManager,
    probe: bool,
}

impl Bootstrapper {
    /// Sequencer with the connectivity probe enabled.
    #[must_use]
    pub const fn new(api: ApiClient, manager: SessionManager) -> Self {
        Self {
            api,
            manager,
            probe: true,
        }
    }

    /// Enable or disable the connectivity probe.
    #[must_use]
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    /// Resolve the auth phase.
    ///
    /// Returns the resolved phase and, when enabled, the probe task handle.
    /// Dropping the handle detaches the probe.
    ///
    /// # Errors
    ///
    /// Returns `Phase` when called a second time in one process.
    pub async fn run(&self) -> ApiResult<(AuthPhase, Option<JoinHandle<()>>)> {
        let state = self.manager.state();
        state.begin_check()?;

        let probe = self.probe.then(|| spawn_probe(self.api.clone()));
        let authenticated = self.manager.bootstrap().await;

        if let Err(err) = state.finish_check(authenticated) {
            // A forced logout during the check already resolved the phase.
            if !state.phase().is_resolved() {
                return Err(err.into());
            }
            debug!(error = %err, "phase resolved during session check");
        }

        let phase = state.phase();
        info!(%phase, "session check finished");
        Ok((phase, probe))
    }
}

/// Best-effort `GET /ping`; never touches session state.
pub async fn probe_connectivity(api: &ApiClient) -> bool {
    let request = ApiRequest::get("ping", endpoints::PING).without_auth_recovery();
    match api.send_json::<Confirmation>(&request).await {
        Ok(_) => {
            info!(api_url = %api.base_url(), "API reachable");
            true
        }
        Err(err) => {
            warn!(api_url = %api.base_url(), error = %err, "API unreachable");
            false
        }
    }
}

fn spawn_probe(api: ApiClient) -> JoinHandle<()> {
    tokio::spawn(async move {
        probe_connectivity(&api).await;
    })
}
