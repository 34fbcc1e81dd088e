//! # warden-api
//!
//! HTTP API layer for Warden built on Axum.
//!
//! Provides the register / login / token endpoints, request logging,
//! error mapping, and the delegated-auth middleware that downstream services
//! mount in front of their own routes.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use middleware::delegated::{RemoteAuthenticator, require_remote_auth};
pub use state::AppState;
