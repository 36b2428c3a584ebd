//! Persisted session record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the client keeps between runs.
///
/// Every field is optional; an empty record means "logged out".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Access token attached as a bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Opaque user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Refresh token used by 401 recovery.
    #[serde(
        default,
        rename = "refreshToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
    /// Cached profile snapshot.
    #[serde(default, rename = "userInfo", skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Value>,
}

impl StoredSession {
    /// Whether a persisted identity exists that bootstrap should validate.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        non_blank(self.token.as_deref()).is_some() && non_blank(self.uid.as_deref()).is_some()
    }

    /// Whether nothing at all is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none()
            && self.uid.is_none()
            && self.refresh_token.is_none()
            && self.user_info.is_none()
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
