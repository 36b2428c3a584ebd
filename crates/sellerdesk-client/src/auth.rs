//! Session manager: the only writer of the durable session besides the
//! wrapper's refresh path.

use sellerdesk_api_models::{Confirmation, LoginRequest, LoginResponse, SignupRequest};
use sellerdesk_session::{AuthPhase, PhaseTransitionError, SessionHandle, SessionState};
use serde_json::Value;
use tracing::{info, warn};

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::request::ApiRequest;

const LOGIN_REJECTED: &str = "login failed; check the e-mail and password";

/// Login, signup, logout and the startup session check.
#[derive(Debug, Clone)]
pub struct SessionManager {
    api: ApiClient,
    session: SessionHandle,
    state: SessionState,
}

fn missing_fields(fields: &[(&'static str, &str)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

fn require_fields(fields: &[(&'static str, &str)]) -> ApiResult<()> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "{} must not be empty",
            missing.join(", ")
        )))
    }
}

impl SessionManager {
    /// `session` must be the same store the `api` client reads from.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionHandle) -> Self {
        let state = api.state().clone();
        Self {
            api,
            session,
            state,
        }
    }

    /// Shared auth phase.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input (no request is sent), `Phase` while the
    /// startup session check has not resolved (no request is sent, nothing
    /// is stored), `InvalidCredentials` when the server rejects the login,
    /// `Network` or `Server` otherwise.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        require_fields(&[("email", email), ("password", password)])?;
        self.ensure_resolved()?;

        let request = ApiRequest::post("login", endpoints::LOGIN)
            .json(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })?
            .without_auth_recovery();

        let response: LoginResponse =
            self.api
                .send_json(&request)
                .await
                .map_err(|err| match err {
                    ApiError::Auth { message } => ApiError::InvalidCredentials { message },
                    ApiError::Server { status, message } if status == 400 || status == 403 => {
                        ApiError::InvalidCredentials { message }
                    }
                    other => other,
                })?;

        let uid = response.uid.trim();
        if uid.is_empty() {
            return Err(ApiError::InvalidCredentials {
                message: LOGIN_REJECTED.to_string(),
            });
        }

        self.session.persist_login(
            uid,
            response.token.clone(),
            response.refresh_token.clone(),
            response.user.clone(),
        )?;
        if let Err(err) = self.state.mark_logged_in() {
            self.discard_session();
            return Err(err.into());
        }
        info!("login succeeded");
        Ok(response)
    }

    fn ensure_resolved(&self) -> ApiResult<()> {
        let phase = self.state.phase();
        if phase.is_resolved() {
            return Ok(());
        }
        Err(PhaseTransitionError {
            from: phase,
            to: AuthPhase::Authenticated,
        }
        .into())
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// `Validation` when any field is blank (no request is sent), otherwise
    /// the wrapper's failure.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<Confirmation> {
        require_fields(&[("email", email), ("password", password), ("name", name)])?;

        let request = ApiRequest::post("signup", endpoints::SIGNUP)
            .json(&SignupRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
                name: name.trim().to_string(),
            })?
            .without_auth_recovery();
        let confirmation = self.api.send_json(&request).await?;
        info!("signup accepted");
        Ok(confirmation)
    }

    /// Clear the stored session and signal a redirect to login.
    ///
    /// Safe to call when already logged out.
    ///
    /// # Errors
    ///
    /// Propagates storage failures; the phase still moves to logged-out.
    pub fn logout(&self) -> ApiResult<()> {
        let cleared = self.session.clear();
        self.state.mark_logged_out(false);
        cleared?;
        info!("logged out");
        Ok(())
    }

    /// Validate the stored session against the server.
    ///
    /// Returns `false` without any request when no token or uid is stored.
    /// Any success status counts as valid and its body becomes the cached
    /// profile (a `null` body leaves the cache alone). On failure the stored
    /// session is cleared and `false` is returned.
    pub async fn bootstrap(&self) -> bool {
        let stored = match self.session.reader().snapshot() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "failed to read stored session");
                return false;
            }
        };
        if !stored.has_identity() {
            info!("no stored identity");
            return false;
        }

        let request = ApiRequest::get("who_am_i", endpoints::WHO_AM_I);
        match self.api.send_json::<Value>(&request).await {
            Ok(Value::Null) => true,
            Ok(profile) => {
                if let Err(err) = self.session.set_profile(profile) {
                    warn!(error = %err, "failed to cache profile");
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "session check failed; clearing session");
                self.discard_session();
                false
            }
        }
    }

    fn discard_session(&self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "failed to clear session storage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::client_for;
    use httpmock::prelude::*;
    use sellerdesk_session::{AuthPhase, SessionEvent};
    use sellerdesk_test_support::session::{empty_handle, seeded_handle, temp_file_handle};
    use serde_json::json;

    fn manager(server: &MockServer, session: SessionHandle) -> SessionManager {
        SessionManager::new(client_for(server, session.clone()), session)
    }

    fn resolved_manager(server: &MockServer, session: SessionHandle) -> SessionManager {
        let manager = manager(server, session);
        manager.state().begin_check().expect("check");
        manager.state().finish_check(false).expect("resolve");
        manager
    }

    #[tokio::test]
    async fn login_persists_identity_and_tags_later_calls() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/login")
                    .json_body(json!({"email": "a@b.com", "password": "x"}));
                then.status(200).json_body(json!({"uid": "u1"}));
            })
            .await;
        let collected = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_collected_products")
                    .query_param("uid", "u1");
                then.status(200).json_body(json!({"products": []}));
            })
            .await;

        let (_dir, session) = temp_file_handle();
        let manager = resolved_manager(&server, session.clone());
        let response = manager.login("a@b.com", "x").await.expect("login");
        assert_eq!(response.uid, "u1");
        assert_eq!(manager.state().phase(), AuthPhase::Authenticated);
        assert_eq!(session.reader().uid().as_deref(), Some("u1"));

        let api = client_for(&server, session);
        api.collected_products().await.expect("collected");
        login.assert_async().await;
        collected.assert_async().await;
    }

    #[tokio::test]
    async fn login_keeps_tokens_and_profile() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(200).json_body(json!({
                    "uid": "u1",
                    "token": "t1",
                    "refreshToken": "r1",
                    "user": {"name": "Kim"}
                }));
            })
            .await;

        let session = empty_handle();
        let manager = resolved_manager(&server, session.clone());
        manager.login("a@b.com", "x").await.expect("login");
        let reader = session.reader();
        assert_eq!(reader.token().as_deref(), Some("t1"));
        assert_eq!(reader.refresh_token().as_deref(), Some("r1"));
        assert_eq!(reader.profile(), Some(json!({"name": "Kim"})));
    }

    #[tokio::test]
    async fn rejected_login_is_invalid_credentials() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(401).json_body(json!({"error": "비밀번호가 틀렸습니다"}));
            })
            .await;

        let session = empty_handle();
        let manager = resolved_manager(&server, session.clone());
        let err = manager.login("a@b.com", "bad").await.expect_err("rejected");
        assert!(matches!(err, ApiError::InvalidCredentials { .. }));
        assert_eq!(err.user_message(), "비밀번호가 틀렸습니다");
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
        assert_eq!(manager.state().phase(), AuthPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn login_before_session_check_stores_nothing() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(200).json_body(json!({"uid": "u1", "token": "t1"}));
            })
            .await;

        let (_dir, session) = temp_file_handle();
        let manager = manager(&server, session.clone());
        let err = manager.login("a@b.com", "x").await.expect_err("unresolved");

        assert!(matches!(err, ApiError::Phase { .. }));
        assert_eq!(manager.state().phase(), AuthPhase::Uninitialized);
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
        login.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn signup_with_empty_name_sends_nothing() {
        let server = MockServer::start_async().await;
        let signup = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let manager = manager(&server, empty_handle());
        let err = manager
            .signup("a@b.com", "pw", "  ")
            .await
            .expect_err("validation");
        assert!(matches!(err, ApiError::Validation { ref message } if message == "name must not be empty"));
        signup.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn signup_returns_confirmation_without_logging_in() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/signup")
                    .json_body(json!({"email": "a@b.com", "password": "pw", "name": "Kim"}));
                then.status(201).json_body(json!({"message": "created"}));
            })
            .await;

        let session = empty_handle();
        let manager = manager(&server, session.clone());
        let confirmation = manager.signup("a@b.com", "pw", "Kim").await.expect("signup");
        assert_eq!(confirmation.message.as_deref(), Some("created"));
        assert!(session.reader().uid().is_none());
    }

    #[tokio::test]
    async fn bootstrap_without_identity_makes_no_calls() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!({"name": "x"}));
            })
            .await;

        let anonymous = manager(&server, empty_handle());
        assert!(!anonymous.bootstrap().await);

        let uid_only = manager(&server, seeded_handle("u1", " ", None));
        assert!(!uid_only.bootstrap().await);
        any.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn bootstrap_failure_clears_storage() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/user-info");
                then.status(500).json_body(json!({"error": "db down"}));
            })
            .await;

        let (_dir, session) = temp_file_handle();
        session
            .persist_login("u1", Some("t1".into()), None, None)
            .expect("seed");
        let manager = manager(&server, session.clone());
        assert!(!manager.bootstrap().await);
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
    }

    #[tokio::test]
    async fn bootstrap_success_refreshes_profile() {
        let server = MockServer::start_async().await;
        let who = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/user-info")
                    .query_param("uid", "u1")
                    .header("authorization", "Bearer t1");
                then.status(200).json_body(json!({"name": "Kim", "plan": "pro"}));
            })
            .await;

        let session = seeded_handle("u1", "t1", None);
        let manager = manager(&server, session.clone());
        assert!(manager.bootstrap().await);
        assert_eq!(
            session.reader().profile(),
            Some(json!({"name": "Kim", "plan": "pro"}))
        );
        who.assert_async().await;
    }

    #[tokio::test]
    async fn bootstrap_accepts_any_success_body() {
        let server = MockServer::start_async().await;
        let who = server
            .mock_async(|when, then| {
                when.method(GET).path("/user-info");
                then.status(200).json_body(json!({}));
            })
            .await;

        let session = seeded_handle("u1", "t1", Some("r1"));
        let manager = manager(&server, session.clone());
        assert!(manager.bootstrap().await);
        let reader = session.reader();
        assert_eq!(reader.uid().as_deref(), Some("u1"));
        assert_eq!(reader.refresh_token().as_deref(), Some("r1"));
        assert_eq!(reader.profile(), Some(json!({})));
        who.assert_async().await;
    }

    #[tokio::test]
    async fn bootstrap_with_null_body_keeps_cached_profile() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/user-info");
                then.status(200).body("null");
            })
            .await;

        let session = seeded_handle("u1", "t1", None);
        session
            .set_profile(json!({"name": "Kim"}))
            .expect("seed profile");
        let manager = manager(&server, session.clone());
        assert!(manager.bootstrap().await);
        assert_eq!(session.reader().profile(), Some(json!({"name": "Kim"})));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let server = MockServer::start_async().await;
        let session = seeded_handle("u1", "t1", Some("r1"));
        let manager = manager(&server, session.clone());
        let mut events = manager.state().subscribe_events();

        manager.logout().expect("first logout");
        manager.logout().expect("second logout");
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
        assert_eq!(manager.state().phase(), AuthPhase::Unauthenticated);
        assert_eq!(events.recv().await.expect("event"), SessionEvent::LoggedOut);
        assert!(events.recv().await.expect("event").redirects_to_login());
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        assert_eq!(
            missing_fields(&[("email", ""), ("password", "x"), ("name", " ")]),
            vec!["email", "name"]
        );
    }
}
