//! Persistence contract used by the credential service.
//!
//! Two implementations ship with the crate: [`postgres`] over the sqlx
//! repositories and [`memory`] for tests and single-process runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::account::{Account, LoginCredential, NewAccount, NewCredential};
use warden_entity::session::Session;

pub use memory::{MemoryAccountStore, MemorySessionStore};
pub use postgres::{PgAccountStore, PgSessionStore};

/// Accounts and their login credentials.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug {
    /// Creates an account and its credential as one unit of work.
    ///
    /// A duplicate email must fail with `ErrorKind::Conflict` and leave no
    /// account behind.
    async fn create_account_with_credential(
        &self,
        account: NewAccount,
        credential: NewCredential,
        now: DateTime<Utc>,
    ) -> AppResult<Account>;

    /// Looks up a credential by normalised email.
    async fn find_credential_by_email(&self, email: &str) -> AppResult<Option<LoginCredential>>;

    /// Looks up an account by id.
    async fn find_account_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// Login sessions backing refresh tokens.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Creates a session for `account_id`.
    async fn create_session(
        &self,
        account_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session>;

    /// Looks up a session by id regardless of status.
    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Sets `revoked_at` if not already set. Returns whether anything changed.
    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Revokes every session of the account still active at `at`.
    async fn revoke_all_for_account(&self, account_id: Uuid, at: DateTime<Utc>) -> AppResult<u64>;
}
