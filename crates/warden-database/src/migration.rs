//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use warden_core::error::{AppError, ErrorKind};

/// Apply the embedded schema migrations (accounts, login credentials,
/// sessions).
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Schema is up to date");
    Ok(())
}
