//! Application builder: router plus middleware stack.

use axum::Router;
use axum::middleware::from_fn;
use tower_http::trace::TraceLayer;

use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
}
