//! The HTTP wrapper every API call goes through.
//!
//! # Design
//! - Outgoing: the stored `uid` is added to the query string unless the call
//!   already names one, and the stored access token is sent as a bearer token.
//! - Incoming: success passes through. A 401 on a recoverable request runs
//!   fail → refresh → replay-once. The replay is never recovered again, so a
//!   server that keeps answering 401 surfaces as `ApiError::Auth`.
//! - Concurrent 401s queue behind one refresh gate. A request that waited
//!   while another renewed the token replays with that token directly.
//! - A failed refresh clears durable storage and forces a logout.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use sellerdesk_api_models::{ErrorBody, RefreshRequest, RefreshResponse};
use sellerdesk_config::ClientConfig;
use sellerdesk_session::{SessionHandle, SessionReader, SessionState};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::request::ApiRequest;

/// Header the tunnelling proxy in front of the API requires.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

const SESSION_EXPIRED: &str = "session expired; please log in again";

/// Shared API client. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: Url,
    session: SessionHandle,
    state: SessionState,
    refresh_gate: Mutex<()>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(TUNNEL_BYPASS_HEADER),
        HeaderValue::from_static("true"),
    );
    headers
}

impl ApiClient {
    /// Build a client for `config.api_url`.
    ///
    /// No cookie store is installed, so credentials never travel implicitly.
    ///
    /// # Errors
    ///
    /// Returns `Network` when the TLS backend cannot be initialised.
    pub fn new(
        config: &ClientConfig,
        session: SessionHandle,
        state: SessionState,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|source| ApiError::Network {
                operation: "client.build",
                source,
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.api_url.clone(),
                session,
                state,
                refresh_gate: Mutex::new(()),
            }),
        })
    }

    /// Base endpoint.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Read-only view of the stored session.
    #[must_use]
    pub fn session(&self) -> SessionReader {
        self.inner.session.reader()
    }

    /// Auth phase shared with the session manager.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.inner.state
    }

    /// Stored uid, or `Auth` when nobody is logged in.
    pub(crate) fn require_uid(&self) -> ApiResult<String> {
        self.session().uid().ok_or_else(|| ApiError::Auth {
            message: "no active session; log in first".to_string(),
        })
    }

    /// Send `request` and decode a JSON response body.
    ///
    /// An empty body decodes as an empty object, so acknowledgement types with
    /// only optional fields accept it.
    ///
    /// # Errors
    ///
    /// Any transport, auth or server failure, or `DataShape` when the body
    /// does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Network {
            operation: request.operation(),
            source,
        })?;
        let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Object(Map::new()))
        } else {
            serde_json::from_slice(&bytes)
        };
        decoded.map_err(|err| ApiError::data_shape(request.operation(), err.to_string()))
    }

    /// Send `request` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Any transport, auth or server failure.
    pub async fn send_bytes(&self, request: &ApiRequest) -> ApiResult<Vec<u8>> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Network {
            operation: request.operation(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    /// Send `request` with identity decoration and 401 recovery.
    ///
    /// # Errors
    ///
    /// `Network` when no response arrives, `Auth` for an unrecovered 401,
    /// `Server` for any other non-success status.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Response> {
        let sent_token = self.session().token();
        let response = self.dispatch(request, sent_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !request.recovers_auth() {
            return check_status(response).await;
        }

        info!(operation = request.operation(), "request unauthorized; attempting token refresh");
        let Some(token) = self.renew_token(sent_token.as_deref()).await? else {
            debug!(operation = request.operation(), "no refresh token stored");
            return check_status(response).await;
        };

        let replay = self.dispatch(request, Some(&token)).await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            warn!(operation = request.operation(), "replayed request still unauthorized");
        }
        check_status(replay).await
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<Response> {
        let uid = self.session().uid();
        let url = request.url(&self.inner.base_url, uid.as_deref())?;
        debug!(method = %request.method(), path = request.path(), "dispatching request");

        let mut builder = self.inner.http.request(request.method().clone(), url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        builder.send().await.map_err(|source| ApiError::Network {
            operation: request.operation(),
            source,
        })
    }

    /// Token to replay with, or `None` when no refresh token is stored.
    async fn renew_token(&self, failed_with: Option<&str>) -> ApiResult<Option<String>> {
        let _gate = self.inner.refresh_gate.lock().await;

        let current = self.session().token();
        if let Some(current) = current.filter(|token| Some(token.as_str()) != failed_with) {
            debug!("access token renewed by a concurrent request");
            return Ok(Some(current));
        }

        let Some(refresh_token) = self.session().refresh_token() else {
            return Ok(None);
        };

        match self.refresh(refresh_token).await {
            Ok(token) => {
                self.inner.session.set_token(&token)?;
                info!("access token refreshed");
                Ok(Some(token))
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed; forcing logout");
                self.force_logout();
                Err(ApiError::Auth {
                    message: SESSION_EXPIRED.to_string(),
                })
            }
        }
    }

    // Dispatched directly: going through `execute` would make recovery
    // recursive.
    async fn refresh(&self, refresh_token: String) -> ApiResult<String> {
        let request = ApiRequest::post("refresh_token", endpoints::REFRESH_TOKEN)
            .json(&RefreshRequest { refresh_token })?
            .without_auth_recovery();
        let response = check_status(self.dispatch(&request, None).await?).await?;
        let response: RefreshResponse = response
            .json()
            .await
            .map_err(|err| ApiError::data_shape("refresh_token", err.to_string()))?;
        let token = response.token.trim();
        if token.is_empty() {
            return Err(ApiError::data_shape("refresh_token", "empty `token`"));
        }
        Ok(token.to_string())
    }

    fn force_logout(&self) {
        if let Err(err) = self.inner.session.clear() {
            warn!(error = %err, "failed to clear session storage");
        }
        self.inner.state.mark_logged_out(true);
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.text().map(str::to_string))
        .unwrap_or_else(|| generic_message(status));

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Auth { message })
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

fn generic_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "authentication required".to_string(),
        status => format!(
            "request failed with status {}",
            status.canonical_reason().map_or_else(
                || status.as_u16().to_string(),
                |reason| format!("{} {reason}", status.as_u16())
            )
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::prelude::*;
    use sellerdesk_api_models::Confirmation;
    use sellerdesk_session::{AuthPhase, SessionEvent};
    use sellerdesk_test_support::session::{empty_handle, seeded_handle};
    use serde_json::json;
    use std::time::Duration;

    pub(crate) fn config_for(server: &MockServer) -> ClientConfig {
        ClientConfig {
            api_url: Url::parse(&server.base_url()).expect("mock url"),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    pub(crate) fn client_for(server: &MockServer, session: SessionHandle) -> ApiClient {
        ApiClient::new(&config_for(server), session, SessionState::new()).expect("client")
    }

    #[tokio::test]
    async fn decorates_requests_with_uid_token_and_default_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_collected_products")
                    .query_param("uid", "u1")
                    .header("authorization", "Bearer t1")
                    .header(TUNNEL_BYPASS_HEADER, "true")
                    .header("content-type", "application/json");
                then.status(200).json_body(json!({"products": []}));
            })
            .await;

        let api = client_for(&server, seeded_handle("u1", "t1", None));
        let request = ApiRequest::get("collected", endpoints::COLLECTED_PRODUCTS);
        let body: Value = api.send_json(&request).await.expect("response");
        assert_eq!(body, json!({"products": []}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_identity() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/ping")
                    .query_param_missing("uid")
                    .header_missing("authorization");
                then.status(200).body("");
            })
            .await;

        let api = client_for(&server, empty_handle());
        let ack: Confirmation = api
            .send_json(&ApiRequest::get("ping", endpoints::PING))
            .await
            .expect("empty body decodes");
        assert_eq!(ack, Confirmation::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_call_refreshes_and_replays_once() {
        let server = MockServer::start_async().await;
        let stale = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_market_db")
                    .header("authorization", "Bearer t1");
                then.status(401).json_body(json!({"error": "token expired"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/refresh_token")
                    .json_body(json!({"refresh_token": "r1"}));
                then.status(200).json_body(json!({"token": "t2"}));
            })
            .await;
        let replay = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_market_db")
                    .query_param("uid", "u1")
                    .header("authorization", "Bearer t2");
                then.status(200).json_body(json!({"markets": [{"mallName": "m"}]}));
            })
            .await;

        let session = seeded_handle("u1", "t1", Some("r1"));
        let api = client_for(&server, session.clone());
        let body: Value = api
            .send_json(&ApiRequest::get("markets", endpoints::MARKETS))
            .await
            .expect("replayed result");

        assert_eq!(body, json!({"markets": [{"mallName": "m"}]}));
        stale.assert_calls_async(1).await;
        refresh.assert_calls_async(1).await;
        replay.assert_calls_async(1).await;
        assert_eq!(session.reader().token().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn second_unauthorized_after_replay_propagates() {
        let server = MockServer::start_async().await;
        let protected = server
            .mock_async(|when, then| {
                when.method(POST).path("/search");
                then.status(401).json_body(json!({"error": "still expired"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(200).json_body(json!({"token": "t2"}));
            })
            .await;

        let api = client_for(&server, seeded_handle("u1", "t1", Some("r1")));
        let request = ApiRequest::post("search", endpoints::SEARCH)
            .json(&json!({"keyword": "mug", "uid": "u1"}))
            .expect("body");
        let err = api.send_json::<Value>(&request).await.expect_err("401");

        assert!(matches!(err, ApiError::Auth { ref message } if message == "still expired"));
        protected.assert_calls_async(2).await;
        refresh.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn missing_refresh_token_propagates_original_401() {
        let server = MockServer::start_async().await;
        let protected = server
            .mock_async(|when, then| {
                when.method(GET).path("/user-info");
                then.status(401).json_body(json!({"error": "login required"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(200).json_body(json!({"token": "t2"}));
            })
            .await;

        let session = seeded_handle("u1", "t1", None);
        let api = client_for(&server, session.clone());
        let err = api
            .send_json::<Value>(&ApiRequest::get("who_am_i", endpoints::WHO_AM_I))
            .await
            .expect_err("401");

        assert_eq!(err.user_message(), "login required");
        protected.assert_calls_async(1).await;
        refresh.assert_calls_async(0).await;
        assert_eq!(session.reader().uid().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn failed_refresh_clears_storage_and_forces_logout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/get_collected_products");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(401).json_body(json!({"error": "refresh token revoked"}));
            })
            .await;

        let session = seeded_handle("u1", "t1", Some("r1"));
        let state = SessionState::new();
        let mut events = state.subscribe_events();
        let api = ApiClient::new(&config_for(&server), session.clone(), state.clone())
            .expect("client");

        let err = api
            .send_json::<Value>(&ApiRequest::get("collected", endpoints::COLLECTED_PRODUCTS))
            .await
            .expect_err("forced logout");

        assert!(err.requires_login());
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
        assert_eq!(state.phase(), AuthPhase::Unauthenticated);
        assert_eq!(events.recv().await.expect("event"), SessionEvent::ForcedLogout);
    }

    #[tokio::test]
    async fn opted_out_requests_skip_recovery() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(401).json_body(json!({"error": "wrong password"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(200).json_body(json!({"token": "t2"}));
            })
            .await;

        let api = client_for(&server, seeded_handle("u1", "t1", Some("r1")));
        let request = ApiRequest::post("login", endpoints::LOGIN).without_auth_recovery();
        let err = api.send_json::<Value>(&request).await.expect_err("401");

        assert!(matches!(err, ApiError::Auth { .. }));
        refresh.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn concurrent_unauthorized_calls_share_one_refresh() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_collected_products")
                    .header("authorization", "Bearer t1");
                then.status(401).delay(Duration::from_millis(50));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(200).json_body(json!({"token": "t2"}));
            })
            .await;
        let replay = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/get_collected_products")
                    .header("authorization", "Bearer t2");
                then.status(200).json_body(json!({"products": []}));
            })
            .await;

        let api = client_for(&server, seeded_handle("u1", "t1", Some("r1")));
        let request = ApiRequest::get("collected", endpoints::COLLECTED_PRODUCTS);
        let (first, second) = tokio::join!(
            api.send_json::<Value>(&request),
            api.send_json::<Value>(&request)
        );

        first.expect("first replay");
        second.expect("second replay");
        refresh.assert_calls_async(1).await;
        replay.assert_calls_async(2).await;
    }

    #[tokio::test]
    async fn concurrent_unauthorized_calls_share_one_failed_refresh() {
        let server = MockServer::start_async().await;
        let protected = server
            .mock_async(|when, then| {
                when.method(GET).path("/get_collected_products");
                then.status(401).delay(Duration::from_millis(50));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh_token");
                then.status(401).json_body(json!({"error": "refresh token revoked"}));
            })
            .await;

        let session = seeded_handle("u1", "t1", Some("r1"));
        let state = SessionState::new();
        let mut events = state.subscribe_events();
        let api = ApiClient::new(&config_for(&server), session.clone(), state.clone())
            .expect("client");
        let request = ApiRequest::get("collected", endpoints::COLLECTED_PRODUCTS);
        let (first, second) = tokio::join!(
            api.send_json::<Value>(&request),
            api.send_json::<Value>(&request)
        );

        assert!(matches!(first, Err(ApiError::Auth { .. })));
        assert!(matches!(second, Err(ApiError::Auth { .. })));
        refresh.assert_calls_async(1).await;
        protected.assert_calls_async(2).await;
        assert!(session.reader().snapshot().expect("snapshot").is_empty());
        assert_eq!(events.recv().await.expect("event"), SessionEvent::ForcedLogout);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn server_errors_carry_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate_seo");
                then.status(500).json_body(json!({"message": "model offline"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/taobao_match");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let api = client_for(&server, seeded_handle("u1", "t1", None));
        let err = api
            .send_json::<Value>(&ApiRequest::post("generate_seo", endpoints::GENERATE_SEO))
            .await
            .expect_err("500");
        assert!(matches!(err, ApiError::Server { status: 500, ref message } if message == "model offline"));

        let err = api
            .send_json::<Value>(&ApiRequest::post("taobao_match", endpoints::IMAGE_MATCH))
            .await
            .expect_err("502");
        assert_eq!(err.user_message(), "request failed with status 502 Bad Gateway");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let config = ClientConfig {
            api_url: Url::parse("http://127.0.0.1:9").expect("url"),
            timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        };
        let api = ApiClient::new(&config, empty_handle(), SessionState::new()).expect("client");
        let err = api
            .send_json::<Value>(&ApiRequest::get("ping", endpoints::PING))
            .await
            .expect_err("no server");
        assert!(matches!(err, ApiError::Network { operation: "ping", .. }));
    }
}
