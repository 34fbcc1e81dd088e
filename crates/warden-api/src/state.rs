//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warden_auth::CredentialService;
use warden_core::config::AppConfig;
use warden_database::DatabasePool;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Register / login / token operations
    pub service: Arc<CredentialService>,
    /// PostgreSQL pool; `None` with the in-memory backend
    pub db: Option<DatabasePool>,
}

impl AppState {
    /// Bundles the shared dependencies.
    pub fn new(config: AppConfig, service: CredentialService, db: Option<DatabasePool>) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
            db,
        }
    }
}
