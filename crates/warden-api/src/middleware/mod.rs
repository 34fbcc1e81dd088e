//! Axum middleware stack.

pub mod delegated;
pub mod logging;
