//! Replayable request descriptor.
//!
//! A descriptor owns everything needed to build the HTTP request again, so the
//! 401 recovery path can reissue the exact same call with a renewed token.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Query parameter carrying the caller's identity.
pub const UID_PARAM: &str = "uid";

/// One call to the remote API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    operation: &'static str,
    path: &'static str,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    recover_auth: bool,
}

impl ApiRequest {
    fn new(method: Method, operation: &'static str, path: &'static str) -> Self {
        Self {
            method,
            operation,
            path,
            query: Vec::new(),
            body: None,
            recover_auth: true,
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(operation: &'static str, path: &'static str) -> Self {
        Self::new(Method::GET, operation, path)
    }

    /// `POST path`.
    #[must_use]
    pub fn post(operation: &'static str, path: &'static str) -> Self {
        Self::new(Method::POST, operation, path)
    }

    /// `PUT path`.
    #[must_use]
    pub fn put(operation: &'static str, path: &'static str) -> Self {
        Self::new(Method::PUT, operation, path)
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(operation: &'static str, path: &'static str) -> Self {
        Self::new(Method::DELETE, operation, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the payload cannot be represented as JSON.
    pub fn json<T: Serialize>(mut self, payload: &T) -> ApiResult<Self> {
        let body = serde_json::to_value(payload).map_err(|err| {
            ApiError::validation(format!("{} payload is not valid JSON: {err}", self.operation))
        })?;
        self.body = Some(body);
        Ok(self)
    }

    /// Report a 401 to the caller instead of attempting a token refresh.
    #[must_use]
    pub fn without_auth_recovery(mut self) -> Self {
        self.recover_auth = false;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Short name used in logs and errors.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Path relative to the base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether a 401 triggers refresh-and-replay.
    #[must_use]
    pub const fn recovers_auth(&self) -> bool {
        self.recover_auth
    }

    /// Whether the query already names a `uid`.
    #[must_use]
    pub fn has_uid(&self) -> bool {
        self.query.iter().any(|(name, _)| *name == UID_PARAM)
    }

    /// Absolute URL for this request.
    ///
    /// `uid` is appended when given and the query does not already carry one.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the joined URL does not parse.
    pub fn url(&self, base: &Url, uid: Option<&str>) -> ApiResult<Url> {
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined)
            .map_err(|err| ApiError::validation(format!("invalid request URL '{joined}': {err}")))?;

        let inject = uid.filter(|_| !self.has_uid());
        if !self.query.is_empty() || inject.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
            if let Some(uid) = inject {
                pairs.append_pair(UID_PARAM, uid);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://localhost:5000/").expect("base url")
    }

    #[test]
    fn uid_is_appended_with_question_mark() {
        let request = ApiRequest::get("collected", "/get_collected_products");
        let url = request.url(&base(), Some("u1")).expect("url");
        assert_eq!(url.as_str(), "http://localhost:5000/get_collected_products?uid=u1");
    }

    #[test]
    fn uid_is_appended_after_existing_query() {
        let request = ApiRequest::get("search", "/search").query("page", "2");
        let url = request.url(&base(), Some("u1")).expect("url");
        assert_eq!(url.as_str(), "http://localhost:5000/search?page=2&uid=u1");
    }

    #[test]
    fn explicit_uid_is_not_duplicated() {
        let request = ApiRequest::get("markets", "/get_market_db").query(UID_PARAM, "other");
        let url = request.url(&base(), Some("u1")).expect("url");
        assert_eq!(url.query(), Some("uid=other"));
    }

    #[test]
    fn no_uid_leaves_url_untouched() {
        let request = ApiRequest::get("ping", "/ping");
        let url = request.url(&base(), None).expect("url");
        assert_eq!(url.as_str(), "http://localhost:5000/ping");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let base = Url::parse("https://tunnel.example/api/").expect("base url");
        let url = ApiRequest::post("login", "/login").url(&base, None).expect("url");
        assert_eq!(url.as_str(), "https://tunnel.example/api/login");
    }

    #[test]
    fn uid_values_are_percent_encoded() {
        let url = ApiRequest::get("ping", "/ping")
            .url(&base(), Some("a b&c"))
            .expect("url");
        assert_eq!(url.query(), Some("uid=a+b%26c"));
    }

    #[test]
    fn json_body_and_recovery_flag() {
        let request = ApiRequest::post("login", "/login")
            .json(&json!({"email": "a@b.com"}))
            .expect("json")
            .without_auth_recovery();
        assert_eq!(request.body(), Some(&json!({"email": "a@b.com"})));
        assert!(!request.recovers_auth());
        assert_eq!(request.method(), &Method::POST);
    }
}
