//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use warden_api::{AppState, build_app};
use warden_auth::{CredentialService, MemoryAccountStore, MemorySessionStore};
use warden_core::ManualClock;
use warden_core::config::{AppConfig, StorageBackend};

/// Password that satisfies the default policy.
pub const STRONG_PASSWORD: &str = "Tr1cky!Horse";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock driving every expiry decision
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `data` of the response envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `error` of the response envelope.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// `error_code` of the response envelope.
    pub fn error_code(&self) -> &str {
        self.body["error_code"].as_str().unwrap_or_default()
    }

    /// Value of the `Set-Cookie` header for `name`, if any.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(|v| v.to_string())
    }

    /// Token from an `Authorization: Bearer` response header.
    pub fn bearer(&self) -> Option<String> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.to_string())
    }
}

/// Tokens returned by a successful login.
pub struct LoggedIn {
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Create a new test application backed by in-memory stores.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        Self::with_config(config)
    }

    /// Same as [`TestApp::new`] with a caller-supplied configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let service = CredentialService::new(
            &config,
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemorySessionStore::new()),
            clock.clone(),
        );
        let router = build_app(AppState::new(config.clone(), service, None));

        Self {
            router,
            clock,
            config,
        }
    }

    /// Moves the service clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Registers `email` with the default names and a strong password.
    pub async fn register(&self, email: &str) -> TestResponse {
        self.post_json(
            "/register",
            serde_json::json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": email,
                "password": STRONG_PASSWORD,
            }),
        )
        .await
    }

    /// Registers and logs in `email`.
    pub async fn login(&self, email: &str) -> LoggedIn {
        let registered = self.register(email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let response = self
            .post_json(
                "/login",
                serde_json::json!({ "email": email, "password": STRONG_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        LoggedIn {
            access_token: response.data()["access_token"]
                .as_str()
                .expect("access_token")
                .to_string(),
            refresh_token: response.data()["refresh_token"]
                .as_str()
                .expect("refresh_token")
                .to_string(),
        }
    }

    /// POST with a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    /// POST with a raw body.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    /// GET with an optional raw `Authorization` header.
    pub async fn get(&self, path: &str, authorization: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(value) = authorization {
            req = req.header(AUTHORIZATION, value);
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    /// Request carrying the refresh cookie.
    pub async fn with_refresh_cookie(&self, method: &str, path: &str, token: &str) -> TestResponse {
        let cookie = format!("{}={}", self.config.session.refresh_cookie_name, token);
        self.send(
            Request::builder()
                .method(method)
                .uri(path)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    /// POST with both a refresh cookie and a JSON body.
    pub async fn post_json_with_refresh_cookie(
        &self,
        path: &str,
        cookie_token: &str,
        body: Value,
    ) -> TestResponse {
        let cookie = format!("{}={}", self.config.session.refresh_cookie_name, cookie_token);
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(COOKIE, cookie)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    /// Sends a request through the router.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).expect("valid timestamp")
}
