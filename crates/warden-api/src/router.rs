//! Route definitions for the Warden HTTP API.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route, threading `AppState` through
/// `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(account_routes())
        .merge(token_routes())
        .merge(health_routes())
        .with_state(state)
}

/// Register, login, logout
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}

/// Access-token validation and refresh
fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token/validate", get(handlers::token::validate))
        .route(
            "/token/refresh",
            get(handlers::token::refresh).post(handlers::token::refresh),
        )
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
