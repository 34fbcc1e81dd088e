//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{BearerToken, parse_bearer};
pub use json::JsonBody;
