//! Account and session endpoints

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::SessionTokens;
use serde::{Deserialize, Serialize};

/// New account payload
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    /// "seeker", "company" or "recruiter"
    pub account_type: String,
}

/// The authenticated account behind the current session
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub account_type: String,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /auth/login. Authenticates and stores the granted session.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens> {
        self.client.login(email, password).await
    }

    /// POST /auth/register. Creates an account; the response grants a session.
    pub async fn register(&self, registration: &Registration) -> Result<SessionTokens> {
        self.client
            .establish_session("/auth/register", registration)
            .await
    }

    /// POST /auth/logout. Revokes and drops the stored session.
    pub async fn logout(&self) {
        self.client.logout().await
    }

    /// GET /auth/me
    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.client.get_json("/auth/me").await
    }
}
