//! Integration tests for registration, login and logout.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{STRONG_PASSWORD, TestApp};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app.register("ada@example.com").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["message"], "user registered");
}

#[tokio::test]
async fn test_register_duplicate_email_case_insensitive() {
    let app = TestApp::new();
    assert_eq!(app.register("ada@example.com").await.status, StatusCode::CREATED);

    let response = app.register("ADA@Example.com").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.error().contains("is not available"), "{}", response.error());
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::new();

    let response = app.register("not-an-email").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error(),
        "could not validate email: invalid email format"
    );
}

#[tokio::test]
async fn test_register_weak_password() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/register",
            json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "ada@example.com",
                "password": "short",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.error().starts_with("could not validate password:"),
        "{}",
        response.error()
    );
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/register",
            json!({ "firstname": "Ada", "email": "ada@example.com", "password": STRONG_PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("could not bind json"), "{}", response.error());
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::new();

    let response = app.post_raw("/register", "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.register("ada@example.com").await;

    let response = app
        .post_json(
            "/login",
            json!({ "email": "Ada@Example.com", "password": STRONG_PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.data()["access_token"].as_str().unwrap().to_string();
    assert!(response.data()["refresh_token"].is_string());
    assert_eq!(response.bearer(), Some(access));

    let cookie = response.cookie("refresh_token").expect("refresh cookie");
    assert!(cookie.contains("HttpOnly"), "{cookie}");
    assert!(cookie.contains("Path=/"), "{cookie}");
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new();
    app.register("ada@example.com").await;

    let wrong_password = app
        .post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": "Wrong!Pass1" }),
        )
        .await;
    let unknown_email = app
        .post_json(
            "/login",
            json!({ "email": "nobody@example.com", "password": STRONG_PASSWORD }),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert!(wrong_password.cookie("refresh_token").is_none());
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    let response = app
        .with_refresh_cookie("POST", "/logout", &tokens.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "logged out");

    let refresh = app
        .with_refresh_cookie("GET", "/token/refresh", &tokens.refresh_token)
        .await;
    assert_eq!(refresh.status, StatusCode::BAD_REQUEST);
    assert_eq!(refresh.error(), "session is revoked");
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::new();
    let tokens = app.login("ada@example.com").await;

    for _ in 0..2 {
        let response = app
            .post_json("/logout", json!({ "refresh_token": tokens.refresh_token }))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_logout_without_token() {
    let app = TestApp::new();

    let response = app.post_raw("/logout", "").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "refresh token is required");
}

#[tokio::test]
async fn test_logout_keeps_other_sessions() {
    let app = TestApp::new();
    let first = app.login("ada@example.com").await;

    let second = app
        .post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": STRONG_PASSWORD }),
        )
        .await;
    let second_refresh = second.data()["refresh_token"].as_str().unwrap().to_string();

    app.with_refresh_cookie("POST", "/logout", &first.refresh_token)
        .await;

    let refresh = app
        .with_refresh_cookie("GET", "/token/refresh", &second_refresh)
        .await;
    assert_eq!(refresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_unparseable_cookie() {
    let app = TestApp::new();

    let response = app
        .with_refresh_cookie("POST", "/logout", "garbage")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let removal = response.cookie("refresh_token").expect("cookie removal");
    assert!(removal.starts_with("refresh_token=;"), "{removal}");
}

#[tokio::test]
async fn test_logout_prefers_body_token() {
    let app = TestApp::new();
    let stale = app.login("ada@example.com").await;
    let current = app
        .post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": STRONG_PASSWORD }),
        )
        .await;
    let current_refresh = current.data()["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .post_json_with_refresh_cookie(
            "/logout",
            &stale.refresh_token,
            json!({ "refresh_token": current_refresh }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stale_refresh = app
        .with_refresh_cookie("GET", "/token/refresh", &stale.refresh_token)
        .await;
    assert_eq!(stale_refresh.status, StatusCode::OK);

    let current_refresh = app
        .with_refresh_cookie("GET", "/token/refresh", &current_refresh)
        .await;
    assert_eq!(current_refresh.error(), "session is revoked");
}
