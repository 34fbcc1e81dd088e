//! In-memory stores using a Tokio mutex, for tests and single-node runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::account::{Account, LoginCredential, NewAccount, NewCredential};
use warden_entity::session::Session;

use super::{AccountStore, SessionStore};

#[derive(Debug, Default)]
struct AccountState {
    accounts: HashMap<Uuid, Account>,
    /// Email -> credential; doubles as the uniqueness index.
    credentials: HashMap<String, LoginCredential>,
}

/// [`AccountStore`] kept in process memory. Data is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    state: Arc<Mutex<AccountState>>,
}

impl MemoryAccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.state.lock().await.accounts.len()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account_with_credential(
        &self,
        account: NewAccount,
        credential: NewCredential,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let mut state = self.state.lock().await;

        if state.credentials.contains_key(&credential.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' already registered",
                credential.email
            )));
        }

        let created = Account {
            id: Uuid::new_v4(),
            first_name: account.first_name,
            last_name: account.last_name,
            created_at: now,
            updated_at: now,
        };
        state.credentials.insert(
            credential.email.clone(),
            LoginCredential {
                account_id: created.id,
                email: credential.email,
                password_hash: credential.password_hash,
                hash_algorithm: credential.hash_algorithm,
            },
        );
        state.accounts.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_credential_by_email(&self, email: &str) -> AppResult<Option<LoginCredential>> {
        Ok(self.state.lock().await.credentials.get(email).cloned())
    }

    async fn find_account_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.state.lock().await.accounts.get(&id).cloned())
    }
}

/// [`SessionStore`] kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `expires_at` of an existing session. Lets tests age a
    /// session without waiting.
    pub async fn set_expiry(&self, id: Uuid, expires_at: DateTime<Utc>) -> bool {
        match self.sessions.lock().await.get_mut(&id) {
            Some(session) => {
                session.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(
        &self,
        account_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            account_id,
            created_at,
            updated_at: created_at,
            expires_at,
            revoked_at: None,
        };
        self.sessions
            .lock()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(at);
                session.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_account(&self, account_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut revoked = 0;
        for session in sessions
            .values_mut()
            .filter(|s| s.account_id == account_id && s.is_active_at(at))
        {
            session.revoked_at = Some(at);
            session.updated_at = at;
            revoked += 1;
        }
        Ok(revoked)
    }
}
