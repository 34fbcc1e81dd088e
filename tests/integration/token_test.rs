//! Integration tests for access-token validation, refresh and health.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_validate_returns_account_summary() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .get(
            "/token/validate",
            Some(&format!("Bearer {}", tokens.access_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["first_name"], "Ada");
    assert_eq!(response.data()["last_name"], "Lovelace");
    assert!(
        uuid::Uuid::parse_str(response.data()["user_id"].as_str().unwrap()).is_ok(),
        "{}",
        response.body
    );
}

#[tokio::test]
async fn test_validate_accepts_lowercase_scheme() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .get(
            "/token/validate",
            Some(&format!("bearer {}", tokens.access_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_validate_missing_header() {
    let app = TestApp::new();

    let response = app.get("/token/validate", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_validate_wrong_scheme() {
    let app = TestApp::new();

    let response = app.get("/token/validate", Some("Basic YWRhOnB3")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_garbage_token() {
    let app = TestApp::new();

    let response = app.get("/token/validate", Some("Bearer not.a.jwt")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("invalid access token"), "{}", response.error());
}

#[tokio::test]
async fn test_validate_rejects_refresh_token() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .get(
            "/token/validate",
            Some(&format!("Bearer {}", tokens.refresh_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_expired_token() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    app.advance(Duration::minutes(app.config.auth.access_token_ttl_minutes));

    let response = app
        .get(
            "/token/validate",
            Some(&format!("Bearer {}", tokens.access_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_validate_token_from_other_deployment() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let mut other_config = app.config.clone();
    other_config.auth.jwt_secret = "a-different-secret".to_string();
    let other = TestApp::with_config(other_config);

    let response = other
        .get(
            "/token/validate",
            Some(&format!("Bearer {}", tokens.access_token)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_via_cookie() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    app.advance(Duration::minutes(30));

    let response = app
        .with_refresh_cookie("GET", "/token/refresh", &tokens.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let fresh = response.data()["access_token"].as_str().unwrap().to_string();
    assert_eq!(response.bearer(), Some(fresh.clone()));
    assert_ne!(fresh, tokens.access_token);

    let validated = app
        .get("/token/validate", Some(&format!("Bearer {fresh}")))
        .await;
    assert_eq!(validated.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_via_body() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .post_json(
            "/token/refresh",
            json!({ "refresh_token": tokens.refresh_token }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert!(response.data()["access_token"].is_string());
}

#[tokio::test]
async fn test_refresh_body_token_wins_over_stale_cookie() {
    let app = TestApp::new();
    let old = app.login("ada@example.com").await;
    app.with_refresh_cookie("POST", "/logout", &old.refresh_token)
        .await;

    let fresh = app
        .post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": helpers::STRONG_PASSWORD }),
        )
        .await;
    let fresh_refresh = fresh.data()["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .post_json_with_refresh_cookie(
            "/token/refresh",
            &old.refresh_token,
            json!({ "refresh_token": fresh_refresh }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();

    let response = app.get("/token/refresh", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .with_refresh_cookie("GET", "/token/refresh", &tokens.access_token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("invalid refresh token"), "{}", response.error());
}

#[tokio::test]
async fn test_refresh_after_session_expiry() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    app.advance(Duration::hours(app.config.session.ttl_hours));

    let response = app
        .with_refresh_cookie("GET", "/token/refresh", &tokens.refresh_token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "session is expired");
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["storage"], "memory");
}
