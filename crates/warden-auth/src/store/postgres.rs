//! PostgreSQL-backed stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_database::DatabasePool;
use warden_database::repositories::{AccountRepository, CredentialRepository, SessionRepository};
use warden_entity::account::{Account, LoginCredential, NewAccount, NewCredential};
use warden_entity::session::{NewSession, Session};

use super::{AccountStore, SessionStore};

/// [`AccountStore`] over the account and credential repositories.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    accounts: AccountRepository,
    credentials: CredentialRepository,
}

impl PgAccountStore {
    /// Creates a store sharing `db`'s pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            accounts: AccountRepository::new(db.pool().clone()),
            credentials: CredentialRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account_with_credential(
        &self,
        account: NewAccount,
        credential: NewCredential,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let (account, _) = self
            .accounts
            .create_with_credential(&account, &credential, now)
            .await?;
        Ok(account)
    }

    async fn find_credential_by_email(&self, email: &str) -> AppResult<Option<LoginCredential>> {
        self.credentials.find_by_email(email).await
    }

    async fn find_account_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        self.accounts.find_by_id(id).await
    }
}

/// [`SessionStore`] over the session repository.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    sessions: SessionRepository,
}

impl PgSessionStore {
    /// Creates a store sharing `db`'s pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            sessions: SessionRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(
        &self,
        account_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        self.sessions
            .create(&NewSession {
                account_id,
                created_at,
                expires_at,
            })
            .await
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>> {
        self.sessions.find_by_id(id).await
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        self.sessions.revoke(id, at).await
    }

    async fn revoke_all_for_account(&self, account_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        self.sessions.revoke_all_for_account(account_id, at).await
    }
}
