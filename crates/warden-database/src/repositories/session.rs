//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::session::{NewSession, Session};

/// Repository for login sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID, whatever its status.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Insert a new session.
    pub async fn create(&self, data: &NewSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, account_id, created_at, updated_at, expires_at) \
             VALUES ($1, $2, $3, $3, $4) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.account_id)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Mark a session revoked. Returns `false` when it was already revoked
    /// or does not exist.
    pub async fn revoke(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2, updated_at = $2 \
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(session_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke session", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session of an account that is still active at `at`.
    pub async fn revoke_all_for_account(
        &self,
        account_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2, updated_at = $2 \
             WHERE account_id = $1 AND revoked_at IS NULL AND expires_at > $2",
        )
        .bind(account_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke account sessions", e)
        })?;

        Ok(result.rows_affected())
    }
}
