//! Login credential repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::account::{LoginCredential, NewCredential};

/// Repository for email/password-hash lookups.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a credential by normalised email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<LoginCredential>> {
        sqlx::query_as::<_, LoginCredential>(
            "SELECT account_id, email, password_hash, hash_algorithm \
             FROM login_credentials WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find credential by email", e)
        })
    }
}

/// Insert a credential row for `account_id` on an existing connection or
/// transaction.
pub async fn insert_credential(
    conn: &mut PgConnection,
    account_id: Uuid,
    credential: &NewCredential,
) -> AppResult<LoginCredential> {
    sqlx::query_as::<_, LoginCredential>(
        "INSERT INTO login_credentials (account_id, email, password_hash, hash_algorithm) \
         VALUES ($1, $2, $3, $4) \
         RETURNING account_id, email, password_hash, hash_algorithm",
    )
    .bind(account_id)
    .bind(&credential.email)
    .bind(&credential.password_hash)
    .bind(credential.hash_algorithm)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("login_credentials_email_key") =>
        {
            AppError::conflict(format!("Email '{}' already registered", credential.email))
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to create credential", e),
    })
}
