//! Warden server binary.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use warden_api::{AppState, build_app};
use warden_auth::store::{PgAccountStore, PgSessionStore};
use warden_auth::{
    AccountStore, CredentialService, MemoryAccountStore, MemorySessionStore, SessionStore,
};
use warden_core::SystemClock;
use warden_core::config::{AppConfig, LogFormat, StorageBackend};
use warden_core::error::AppError;
use warden_database::DatabasePool;
use warden_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `WARDEN__*` environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("WARDEN_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("WARDEN_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));

    let (db, accounts, sessions): (
        Option<DatabasePool>,
        Arc<dyn AccountStore>,
        Arc<dyn SessionStore>,
    ) = match config.database.backend {
        StorageBackend::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                run_migrations(db.pool()).await?;
            }
            let accounts: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(&db));
            let sessions: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(&db));
            (Some(db), accounts, sessions)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; accounts and sessions are lost on restart");
            let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
            let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
            (None, accounts, sessions)
        }
    };

    let service = CredentialService::new(&config, accounts, sessions, Arc::new(SystemClock));

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(AppState::new(config, service, db.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Warden server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(db) = db {
        if tokio::time::timeout(grace, db.close()).await.is_err() {
            tracing::warn!("Database pool did not close within {:?}", grace);
        }
    }

    tracing::info!("Warden server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
