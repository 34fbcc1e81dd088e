//! Integration tests for the delegated-auth middleware against a live
//! Warden listener.

mod helpers;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use warden_api::middleware::delegated::MAX_ERROR_BODY_BYTES;
use warden_api::{RemoteAuthenticator, require_remote_auth};
use warden_entity::AccountSummary;

use helpers::TestApp;

/// Starts `app` on an ephemeral port and returns its validate URL.
async fn serve(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let router = app.router.clone();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });

    format!("http://{addr}/token/validate")
}

async fn whoami(Extension(summary): Extension<AccountSummary>) -> Json<AccountSummary> {
    Json(summary)
}

fn downstream(validate_url: &str) -> Router {
    let auth = RemoteAuthenticator::new(validate_url).expect("authenticator");
    Router::new()
        .route("/whoami", get(whoami))
        .layer(axum::middleware::from_fn_with_state(auth, require_remote_auth))
}

async fn call(router: &Router, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        req = req.header(AUTHORIZATION, value);
    }
    let response = router
        .clone()
        .oneshot(req.body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let auth_app = TestApp::new();
    let tokens = auth_app.login("ada@example.com").await;
    let router = downstream(&serve(&auth_app).await);

    let (status, body) = call(&router, Some(&format!("Bearer {}", tokens.access_token))).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["last_name"], "Lovelace");
}

#[tokio::test]
async fn test_missing_header_is_rejected_locally() {
    // Port 9 is discard; the middleware must not get that far.
    let router = downstream("http://127.0.0.1:9/token/validate");

    let (status, body) = call(&router, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is required");
}

#[tokio::test]
async fn test_non_bearer_header_is_rejected_locally() {
    let router = downstream("http://127.0.0.1:9/token/validate");

    let (status, body) = call(&router, Some("Basic YWRhOnB3")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid Authorization header format");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let auth_app = TestApp::new();
    let router = downstream(&serve(&auth_app).await);

    let (status, body) = call(&router, Some("Bearer not.a.jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Auth server error"),
        "{body}"
    );
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let auth_app = TestApp::new();
    let tokens = auth_app.login("ada@example.com").await;
    let router = downstream(&serve(&auth_app).await);

    auth_app.advance(Duration::hours(1));

    let (status, body) = call(&router, Some(&format!("Bearer {}", tokens.access_token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        body["error"].as_str().unwrap_or_default().contains("TOKEN_EXPIRED"),
        "{body}"
    );
}

#[tokio::test]
async fn test_unreachable_auth_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let router = downstream(&format!("http://{addr}/token/validate"));

    let (status, _) = call(&router, Some("Bearer whatever")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_rejection_body_is_truncated() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let noisy = Router::new().route(
        "/token/validate",
        get(|| async { (StatusCode::UNAUTHORIZED, "x".repeat(4 * 1024 * 1024)) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, noisy).await.expect("server");
    });

    let router = downstream(&format!("http://{addr}/token/validate"));
    let (status, body) = call(&router, Some("Bearer whatever")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("Auth server error: x"), "{message}");
    assert_eq!(
        message.len(),
        "Auth server error: ".len() + MAX_ERROR_BODY_BYTES
    );
}
