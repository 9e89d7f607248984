//! Session token types and auth wire bodies

use serde::{Deserialize, Serialize};

/// Bearer token pair for an authenticated session
///
/// At most one pair exists at a time. A successful renewal replaces the
/// access token and keeps the refresh token unless the backend rotated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Body sent to the renewal endpoint
#[derive(Debug, Serialize)]
pub struct RenewRequest {
    pub refresh_token: String,
}

/// Body returned by the renewal endpoint
///
/// `refresh_token` is only present when the backend rotates it; otherwise the
/// stored refresh token stays valid and is reused.
#[derive(Debug, Deserialize)]
pub struct RenewResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Body returned by the login and register endpoints
#[derive(Debug, Deserialize)]
pub struct SessionGrant {
    pub access_token: String,
    pub refresh_token: String,
}
