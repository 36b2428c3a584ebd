//! Shared context, session wiring and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::anyhow;
use sellerdesk_client::{ApiClient, ApiError, Bootstrapper, SearchView, SessionManager};
use sellerdesk_config::ClientConfig;
use sellerdesk_session::{
    AuthPhase, FileStore, Route, RouteDecision, RouteGuard, SessionHandle, SessionState,
    SessionStore,
};

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation { message } | ApiError::InvalidCredentials { message } => {
                Self::Validation(message)
            }
            other if other.requires_login() => Self::Failure(anyhow!(
                "{}; run `sellerdesk login`",
                other.user_message()
            )),
            other => {
                let message = other.user_message();
                Self::Failure(anyhow::Error::new(other).context(message))
            }
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) sessions: SessionManager,
    pub(crate) search: SearchView,
    pub(crate) output: OutputFormat,
    bootstrapper: Bootstrapper,
}

impl AppContext {
    /// Context backed by the session file named in `config`.
    pub(crate) fn new(config: &ClientConfig, output: OutputFormat) -> CliResult<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(config.session_path.clone()));
        Self::with_session(config, SessionHandle::new(store), output, true)
    }

    pub(crate) fn with_session(
        config: &ClientConfig,
        session: SessionHandle,
        output: OutputFormat,
        probe: bool,
    ) -> CliResult<Self> {
        let api = ApiClient::new(config, session.clone(), SessionState::new())?;
        let sessions = SessionManager::new(api.clone(), session);
        let bootstrapper = Bootstrapper::new(api.clone(), sessions.clone()).with_probe(probe);
        let search = SearchView::new(api.clone());
        Ok(Self {
            api,
            sessions,
            search,
            output,
            bootstrapper,
        })
    }

    /// Validate the stored session. The connectivity probe is detached.
    pub(crate) async fn resolve_phase(&self) -> CliResult<AuthPhase> {
        let (phase, _probe) = self.bootstrapper.run().await?;
        Ok(phase)
    }

    /// Resolve the session and check that `route` may be shown.
    pub(crate) async fn enter(&self, route: Route) -> CliResult<()> {
        let phase = self.resolve_phase().await?;
        match RouteGuard::decide(route, phase) {
            RouteDecision::Render => Ok(()),
            RouteDecision::Redirect(Route::Login) => Err(CliError::validation(
                "not logged in; run `sellerdesk login` first",
            )),
            RouteDecision::Redirect(target) => Err(CliError::validation(format!(
                "{} is not available; use {}",
                route.path(),
                target.path()
            ))),
            RouteDecision::Loading => Err(CliError::failure(anyhow!(
                "session check did not finish"
            ))),
        }
    }
}

/// Password from the flag or environment, else an interactive prompt.
pub(crate) fn resolve_password(provided: Option<String>) -> CliResult<String> {
    if let Some(password) = provided {
        if password.is_empty() {
            return Err(CliError::validation("password must not be empty"));
        }
        return Ok(password);
    }

    if io::stdin().is_terminal() {
        let password = rpassword::prompt_password("Password: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?;
        if password.is_empty() {
            return Err(CliError::validation("password must not be empty"));
        }
        return Ok(password);
    }

    Err(CliError::validation(
        "password required; pass --password or set SELLERDESK_PASSWORD",
    ))
}
