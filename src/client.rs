//! API client core with automatic credential attachment and one-shot
//! session renewal

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::endpoints::analytics::AnalyticsApi;
use crate::endpoints::applications::ApplicationsApi;
use crate::endpoints::auth::AuthApi;
use crate::endpoints::candidates::CandidatesApi;
use crate::endpoints::companies::CompaniesApi;
use crate::endpoints::documents::DocumentsApi;
use crate::endpoints::jobs::JobsApi;
use crate::endpoints::notifications::NotificationsApi;
use crate::endpoints::users::UsersApi;
use crate::error::{ApiError, Result};
use crate::session::{RenewRequest, RenewResponse, SessionGrant, SessionTokens};
use crate::session_store::{MemoryStore, SessionStore};
use async_singleflight::Group;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const RENEW_PATH: &str = "/auth/refresh";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

const SESSION_EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications emitted by the client
///
/// The transport layer never navigates; consumers subscribe and react (a UI
/// would route to its login view on `Expired`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Renewal failed or was not possible; both tokens were cleared
    Expired,
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Renewing,
}

/// One file in a multipart upload
///
/// Parts own their bytes so the request can be rebuilt if it is re-issued
/// after a session renewal.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Request payload
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

/// Per-call overrides
///
/// `headers` win over the configured default headers; `query` parameters are
/// appended to the URL; `cancel` aborts the call at the next await point.
#[derive(Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub cancel: Option<CancelToken>,
}

/// Response envelope: status code plus parsed JSON body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

struct RawResponse {
    status: u16,
    body: serde_json::Value,
}

/// API client with automatic credential attachment and one-shot renewal
///
/// Owns the configured HTTP client and the injected session store. Every
/// endpoint group dispatches through [`ApiClient::request`]: a stored access
/// token is attached as `Authorization: Bearer <token>`, a 401 triggers
/// exactly one coalesced session renewal and one retry per call, and every
/// other failure propagates to the caller unchanged.
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    /// Singleflight group so N concurrent 401s produce exactly one renewal call
    renew_singleflight: Group<String, String>,
    renewing: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a client with an in-memory session store.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a client with an injected session store.
    pub fn with_store(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(build_header_map(&config.default_headers)?)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Ok(Self {
            config,
            http,
            store,
            renew_singleflight: Group::new(),
            renewing: AtomicBool::new(false),
            events,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session store (for seeding or inspecting tokens)
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current state of the stored session.
    pub fn session_state(&self) -> SessionState {
        if self.renewing.load(Ordering::SeqCst) {
            SessionState::Renewing
        } else if self.store.access_token().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Issue a request against the configured base URL.
    ///
    /// On a 401 the client attempts exactly one session renewal and, if it
    /// succeeds, re-issues the request once with the new token. A renewal
    /// failure clears both tokens, broadcasts [`SessionEvent::Expired`] and
    /// surfaces [`ApiError::Unauthorized`]. Any other non-2xx status maps to
    /// [`ApiError::Http`] without retries.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        ensure_live(&options.cancel)?;

        let response = self.send_once(&method, path, &body, &options).await?;
        if response.status != 401 {
            return finish(response);
        }

        // A cancelled call consumes no renewal budget
        ensure_live(&options.cancel)?;

        debug!(%method, path, "Received 401, attempting session renewal");
        self.renew_session().await?;

        let retried = self.send_once(&method, path, &body, &options).await?;
        ensure_live(&options.cancel)?;
        if retried.status == 401 {
            warn!(path, "Request still unauthorized after session renewal");
            return Err(ApiError::Unauthorized);
        }

        finish(retried)
    }

    /// GET `path` and deserialize the response body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None, RequestOptions::default())
            .await?
            .json()
    }

    /// GET `path` with per-call options and deserialize the response body.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::GET, path, None, options).await?.json()
    }

    /// POST a JSON body to `path` and deserialize the response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let value = serde_json::to_value(body)?;
        self.request(
            Method::POST,
            path,
            Some(RequestBody::Json(value)),
            RequestOptions::default(),
        )
        .await?
        .json()
    }

    /// POST without a body.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::POST, path, None, RequestOptions::default())
            .await
    }

    /// PUT a JSON body to `path` and deserialize the response.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let value = serde_json::to_value(body)?;
        self.request(
            Method::PUT,
            path,
            Some(RequestBody::Json(value)),
            RequestOptions::default(),
        )
        .await?
        .json()
    }

    /// PATCH a JSON body to `path` and deserialize the response.
    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let value = serde_json::to_value(body)?;
        self.request(
            Method::PATCH,
            path,
            Some(RequestBody::Json(value)),
            RequestOptions::default(),
        )
        .await?
        .json()
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Concurrent invocations coalesce into a single wire call and share its
    /// outcome. Any failure (no refresh token, rejection, transport error,
    /// malformed response) clears both tokens and broadcasts
    /// [`SessionEvent::Expired`].
    pub async fn renew_session(&self) -> Result<String> {
        let key = self.config.base_url.clone();
        let (token, error, _shared) = self
            .renew_singleflight
            .work(&key, async {
                match self.do_renew().await {
                    Ok(access_token) => Ok(access_token),
                    Err(e) => {
                        let message = e.to_string();
                        warn!(error = %message, "Session renewal failed");
                        Err(message)
                    }
                }
            })
            .await;

        match (token, error) {
            (Some(access_token), None) => Ok(access_token),
            _ => Err(ApiError::Unauthorized),
        }
    }

    async fn do_renew(&self) -> Result<String> {
        self.renewing.store(true, Ordering::SeqCst);
        let result = self.renew_inner().await;
        self.renewing.store(false, Ordering::SeqCst);

        if result.is_err() {
            self.expire_session();
        }
        result
    }

    async fn renew_inner(&self) -> Result<String> {
        let refresh_token = self.store.refresh_token().ok_or_else(|| {
            warn!("No refresh token stored, cannot renew session");
            ApiError::Unauthorized
        })?;

        let url = format!("{}{}", self.config.base_url, RENEW_PATH);
        let request = RenewRequest {
            refresh_token: refresh_token.clone(),
        };

        debug!(url, "Renewing session");
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            warn!(status, error = %text, "Renewal endpoint rejected the refresh token");
            return Err(ApiError::Unauthorized);
        }

        let renewed: RenewResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Network(format!("malformed renewal response: {e}")))?;

        let tokens = SessionTokens {
            access_token: renewed.access_token,
            // The refresh token is reused until the backend rotates it
            refresh_token: renewed.refresh_token.unwrap_or(refresh_token),
        };
        self.store.set_tokens(&tokens);
        info!("Access token renewed");

        Ok(tokens.access_token)
    }

    fn expire_session(&self) {
        self.store.clear();
        let _ = self.events.send(SessionEvent::Expired);
    }

    /// Authenticate with credentials and store the granted session.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens> {
        let credentials = serde_json::json!({ "email": email, "password": password });
        let tokens = self.establish_session(LOGIN_PATH, &credentials).await?;
        info!("Logged in");
        Ok(tokens)
    }

    /// Drop the stored session.
    ///
    /// Server-side revocation is best-effort; the local tokens are removed
    /// regardless of the call's outcome. No `Expired` event is emitted for an
    /// explicit logout.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.store.refresh_token() {
            let url = format!("{}{}", self.config.base_url, LOGOUT_PATH);
            let body = serde_json::json!({ "refresh_token": refresh_token });
            if let Err(err) = self.http.post(&url).json(&body).send().await {
                debug!(error = %err, "Logout revocation call failed");
            }
        }

        self.store.clear();
        info!("Logged out");
    }

    /// POST credentials to a session-granting endpoint and store the result.
    ///
    /// Bypasses [`ApiClient::request`]: a 401 here means bad credentials, not
    /// an expired session, so no renewal cycle applies.
    pub(crate) async fn establish_session<B: Serialize>(
        &self,
        path: &str,
        credentials: &B,
    ) -> Result<SessionTokens> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        if !(200..300).contains(&status) {
            if status == 401 {
                return Err(ApiError::Unauthorized);
            }
            return Err(ApiError::Http {
                status,
                body: parse_body(&text),
            });
        }

        let grant: SessionGrant = serde_json::from_str(&text)?;
        let tokens = SessionTokens::new(grant.access_token, grant.refresh_token);
        self.store.set_tokens(&tokens);

        Ok(tokens)
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: &Option<RequestBody>,
        options: &RequestOptions,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut builder = self.http.request(method.clone(), &url);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }

        // The token is read per attempt so a retry after renewal picks up
        // the replacement
        if let Some(token) = self.store.access_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(parts)) => builder.multipart(build_form(parts)?),
            None => builder,
        };

        // Per-call headers go last with replace semantics so they win over
        // body and default headers
        if !options.headers.is_empty() {
            builder = builder.headers(build_header_map(&options.headers)?);
        }

        debug!(%method, url, "Dispatching request");
        let send = builder.send();
        let response = match &options.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(ApiError::Cancelled),
                    result = send => result,
                }
            }
            None => send.await,
        }
        .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        Ok(RawResponse {
            status,
            body: parse_body(&text),
        })
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn companies(&self) -> CompaniesApi<'_> {
        CompaniesApi::new(self)
    }

    pub fn applications(&self) -> ApplicationsApi<'_> {
        ApplicationsApi::new(self)
    }

    pub fn candidates(&self) -> CandidatesApi<'_> {
        CandidatesApi::new(self)
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi::new(self)
    }
}

fn ensure_live(cancel: &Option<CancelToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(ApiError::Cancelled),
        _ => Ok(()),
    }
}

fn finish(response: RawResponse) -> Result<ApiResponse> {
    if (200..300).contains(&response.status) {
        Ok(ApiResponse {
            status: response.status,
            body: response.body,
        })
    } else {
        Err(ApiError::Http {
            status: response.status,
            body: response.body,
        })
    }
}

fn build_header_map(pairs: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Configuration(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Configuration(format!("invalid header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn build_form(parts: &[FilePart]) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let piece = reqwest::multipart::Part::bytes(part.bytes.clone())
            .file_name(part.file_name.clone())
            .mime_str(&part.content_type)
            .map_err(|e| {
                ApiError::Configuration(format!(
                    "invalid content type {}: {e}",
                    part.content_type
                ))
            })?;
        form = form.part(part.name.clone(), piece);
    }
    Ok(form)
}

/// Empty bodies parse as JSON null; non-JSON bodies are preserved verbatim
/// for error display.
fn parse_body(text: &str) -> serde_json::Value {
    if text.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}
