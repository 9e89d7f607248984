//! Integration tests for the core client: credential attachment, one-shot
//! renewal, single-flight coalescing, cancellation and error mapping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use talentgrid_client::{
    ApiClient, ApiError, CancelToken, ClientConfig, RequestOptions, SessionEvent, SessionState,
    SessionStore, SessionTokens,
};
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri())).unwrap()
}

/// Store that lets tests seed a partial token pair and count writes
#[derive(Default)]
struct RecordingStore {
    access: Mutex<Option<String>>,
    refresh: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl RecordingStore {
    fn seeded(access: Option<&str>, refresh: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            access: Mutex::new(access.map(str::to_string)),
            refresh: Mutex::new(refresh.map(str::to_string)),
            writes: AtomicUsize::new(0),
        })
    }
}

impl SessionStore for RecordingStore {
    fn access_token(&self) -> Option<String> {
        self.access.lock().unwrap().clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh.lock().unwrap().clone()
    }

    fn set_tokens(&self, tokens: &SessionTokens) {
        *self.access.lock().unwrap() = Some(tokens.access_token.clone());
        *self.refresh.lock().unwrap() = Some(tokens.refresh_token.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self) {
        *self.access.lock().unwrap() = None;
        *self.refresh.lock().unwrap() = None;
    }
}

#[tokio::test]
async fn attaches_bearer_token_and_returns_body() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("tok-A", "ref-1"));

    Mock::given(method("GET"))
        .and(path("/jobs/42"))
        .and(header("authorization", "Bearer tok-A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": "Engineer",
            "company_id": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let job = client.jobs().get(42).await.unwrap();
    assert_eq!(job.id, 42);
    assert_eq!(job.title, "Engineer");
}

#[tokio::test]
async fn sends_no_authorization_header_when_unauthenticated() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Analyst",
            "company_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.jobs().get(7).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn renews_once_and_retries_with_new_token() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("expired", "ref-1"));

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-B"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer tok-B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "sam@example.com",
            "name": "Sam"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client.users().profile().await.unwrap();
    assert_eq!(profile.email, "sam@example.com");

    // Renewal replaced the access token and reused the refresh token
    assert_eq!(client.store().access_token().as_deref(), Some("tok-B"));
    assert_eq!(client.store().refresh_token().as_deref(), Some("ref-1"));
}

#[tokio::test]
async fn renewal_stores_rotated_refresh_token() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("expired", "ref-1"));

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-B",
            "refresh_token": "ref-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.renew_session().await.unwrap();

    assert_eq!(client.store().access_token().as_deref(), Some("tok-B"));
    assert_eq!(client.store().refresh_token().as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn renewal_failure_clears_tokens_and_emits_expired() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("expired", "ref-dead"));
    let mut events = client.subscribe();

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "refresh token revoked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.users().profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    assert!(client.store().access_token().is_none());
    assert!(client.store().refresh_token().is_none());
    assert!(matches!(events.try_recv(), Ok(SessionEvent::Expired)));
}

#[tokio::test]
async fn missing_refresh_token_fails_without_renewal_call() {
    let server = MockServer::start().await;
    let store = RecordingStore::seeded(Some("expired"), None);
    let client =
        ApiClient::with_store(ClientConfig::new(server.uri()), store.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.users().profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    // Storage is empty afterwards
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn concurrent_401s_coalesce_into_one_renewal() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("expired", "ref-1"));

    // Delay the 401s so all five requests are in flight before any renewal
    // starts, and the renewal so every waiter joins the same flight
    Mock::given(method("GET"))
        .and(path("/work"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(100)))
        .expect(5)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "ref-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-B" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/work"))
        .and(header("authorization", "Bearer tok-B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(5)
        .mount(&server)
        .await;

    let issue = || client.request(Method::GET, "/work", None, RequestOptions::default());
    let results = tokio::join!(issue(), issue(), issue(), issue(), issue());

    assert!(results.0.is_ok());
    assert!(results.1.is_ok());
    assert!(results.2.is_ok());
    assert!(results.3.is_ok());
    assert!(results.4.is_ok());
    assert_eq!(client.store().access_token().as_deref(), Some("tok-B"));
}

#[tokio::test]
async fn cancelled_request_writes_no_tokens_and_skips_renewal() {
    let server = MockServer::start().await;
    let store = RecordingStore::seeded(Some("tok-A"), Some("ref-1"));
    let client =
        ApiClient::with_store(ClientConfig::new(server.uri()), store.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancelToken::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let options = RequestOptions {
        cancel: Some(cancel),
        ..Default::default()
    };
    let err = client
        .request(Method::GET, "/slow", None, options)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Cancelled));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(store.access_token().as_deref(), Some("tok-A"));
}

#[tokio::test]
async fn pre_cancelled_request_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let cancel = CancelToken::new();
    cancel.cancel();

    let options = RequestOptions {
        cancel: Some(cancel),
        ..Default::default()
    };
    let err = client
        .request(Method::GET, "/jobs", None, options)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Cancelled));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn second_401_after_renewal_surfaces_unauthorized() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("expired", "ref-1"));

    // The endpoint rejects both the old and the renewed token
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-B"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.users().profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    // Renewal itself succeeded; only the retried call was rejected
    assert_eq!(client.store().access_token().as_deref(), Some("tok-B"));
}

#[tokio::test]
async fn non_401_errors_surface_status_and_body_without_renewal() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("tok-A", "ref-1"));

    Mock::given(method("GET"))
        .and(path("/jobs/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "job not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .request(Method::GET, "/jobs/99", None, RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body["error"], "job not found");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_map_to_timeout() {
    let server = MockServer::start().await;
    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client
        .request(Method::GET, "/slow", None, RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_host_maps_to_network_error() {
    // Nothing listens on the discard port
    let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();

    let err = client
        .request(Method::GET, "/jobs", None, RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn per_call_header_overrides_default() {
    let server = MockServer::start().await;
    let config =
        ClientConfig::new(server.uri()).with_default_header("x-client", "default-value");
    let client = ApiClient::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(header("x-client", "per-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions {
        headers: vec![("x-client".to_string(), "per-call".to_string())],
        ..Default::default()
    };
    client
        .request(Method::GET, "/jobs", None, options)
        .await
        .unwrap();
}

#[tokio::test]
async fn login_stores_granted_session() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    assert_eq!(client.session_state(), SessionState::Unauthenticated);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "sam@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-A",
            "refresh_token": "ref-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.login("sam@example.com", "hunter2").await.unwrap();

    assert_eq!(client.session_state(), SessionState::Authenticated);
    assert_eq!(client.store().access_token().as_deref(), Some("tok-A"));
    assert_eq!(client.store().refresh_token().as_deref(), Some("ref-1"));
}

#[tokio::test]
async fn login_rejection_does_not_trigger_renewal() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.login("sam@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(client.store().access_token().is_none());
}

#[tokio::test]
async fn logout_clears_tokens_without_expired_event() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .store()
        .set_tokens(&SessionTokens::new("tok-A", "ref-1"));
    let mut events = client.subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(body_json(json!({ "refresh_token": "ref-1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await;

    assert_eq!(client.session_state(), SessionState::Unauthenticated);
    assert!(client.store().access_token().is_none());
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
