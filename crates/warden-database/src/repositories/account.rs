//! Account repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::account::{Account, LoginCredential, NewAccount, NewCredential};

use super::credential::insert_credential;

/// Repository for accounts and their registration.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Insert an account and its login credential in one transaction.
    ///
    /// Either both rows exist afterwards or neither does. A duplicate email
    /// surfaces as [`ErrorKind::Conflict`].
    pub async fn create_with_credential(
        &self,
        account: &NewAccount,
        credential: &NewCredential,
        now: DateTime<Utc>,
    ) -> AppResult<(Account, LoginCredential)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let created = insert_account(&mut *tx, account, now).await?;
        let stored = insert_credential(&mut *tx, created.id, credential).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        debug!(account_id = %created.id, "Account row committed");
        Ok((created, stored))
    }
}

/// Insert a bare account row on an existing connection or transaction.
pub async fn insert_account(
    conn: &mut PgConnection,
    account: &NewAccount,
    now: DateTime<Utc>,
) -> AppResult<Account> {
    sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (id, first_name, last_name, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $4) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create account", e))
}
