//! Credential and session lifecycle: register, login, validate, refresh,
//! logout.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use warden_core::Clock;
use warden_core::config::AppConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::account::{Account, AccountSummary, NewAccount, NewCredential};
use warden_entity::normalize_email;

use crate::jwt::{KeyRing, TokenCodec};
use crate::password::{HashError, PasswordHasher};
use crate::roles::{RoleResolver, StaticRoleResolver};
use crate::store::{AccountStore, SessionStore};
use crate::validate::{PasswordPolicy, validate_email};

/// Message shared by every failed login so that callers cannot tell an
/// unknown email from a wrong password.
const INVALID_LOGIN: &str = "invalid email or password";

/// Tokens handed out on a successful login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedTokens {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Session-bound refresh token.
    pub refresh_token: String,
    /// Expiry of the access token.
    pub access_expires_at: DateTime<Utc>,
    /// Expiry of the refresh token (and of the session).
    pub refresh_expires_at: DateTime<Utc>,
}

/// Result of a successful refresh.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RefreshedToken {
    /// New access token.
    pub access_token: String,
    /// Its expiry.
    pub access_expires_at: DateTime<Utc>,
}

/// Orchestrates validators, hasher, token codec and stores.
#[derive(Clone)]
pub struct CredentialService {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    roles: Arc<dyn RoleResolver>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    codec: TokenCodec,
    access_ttl: Duration,
    session_ttl: Duration,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("codec", &self.codec)
            .field("access_ttl", &self.access_ttl)
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    /// Wires a service from configuration. Roles default to
    /// `auth.default_roles`.
    pub fn new(
        config: &AppConfig,
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            roles: Arc::new(StaticRoleResolver::from_config(&config.auth)),
            codec: TokenCodec::new(KeyRing::from_config(&config.auth), clock.clone()),
            clock,
            hasher: PasswordHasher::new(),
            policy: PasswordPolicy::new(&config.auth),
            access_ttl: Duration::try_minutes(config.auth.access_token_ttl_minutes)
                .unwrap_or(Duration::MAX),
            session_ttl: Duration::try_hours(config.session.ttl_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Replaces the role resolver.
    pub fn with_role_resolver(mut self, roles: Arc<dyn RoleResolver>) -> Self {
        self.roles = roles;
        self
    }

    /// The codec tokens are issued with.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Registers a new account.
    ///
    /// 1. Validate email shape
    /// 2. Validate password rules
    /// 3. Advisory uniqueness check
    /// 4. Hash the password off the async executor
    /// 5. Create account + credential atomically; the storage uniqueness
    ///    constraint is authoritative
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<Account> {
        if !validate_email(email) {
            return Err(AppError::validation(
                "could not validate email: invalid email format",
            ));
        }
        let email = normalize_email(email);
        debug!(email = %email, "Registering account");

        self.policy
            .check(password, &[first_name, last_name, email.as_str()])
            .map_err(|v| AppError::validation(format!("could not validate password: {v}")))?;

        if self
            .accounts
            .find_credential_by_email(&email)
            .await
            .map_err(|e| internal("could not look up email", e))?
            .is_some()
        {
            return Err(email_taken(&email));
        }

        let password_hash = self.hash_blocking(password.to_string()).await?;

        let account = self
            .accounts
            .create_account_with_credential(
                NewAccount {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                },
                NewCredential {
                    email: email.clone(),
                    password_hash,
                    hash_algorithm: self.hasher.algorithm(),
                },
                self.clock.now(),
            )
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Conflict => {
                    warn!(email = %email, "Registration lost a uniqueness race");
                    email_taken(&email)
                }
                _ => internal("could not create account", e),
            })?;

        info!(account_id = %account.id, algorithm = %self.hasher.algorithm(), "Account registered");
        Ok(account)
    }

    /// Authenticates an email/password pair and opens a session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<IssuedTokens> {
        let email = normalize_email(email);

        let credential = self
            .accounts
            .find_credential_by_email(&email)
            .await
            .map_err(|e| internal("could not get login data", e))?;

        let Some(credential) = credential else {
            self.verify_dummy_blocking(password.to_string()).await;
            debug!("Login for unknown email");
            return Err(AppError::validation(INVALID_LOGIN));
        };

        match self
            .verify_blocking(password.to_string(), credential.password_hash.clone())
            .await
        {
            Ok(()) => {}
            Err(HashError::Mismatch) => {
                debug!(account_id = %credential.account_id, "Login with wrong password");
                return Err(AppError::validation(INVALID_LOGIN));
            }
            Err(e) => {
                error!(account_id = %credential.account_id, error = %e, "Stored hash unusable");
                return Err(AppError::with_source(
                    ErrorKind::Internal,
                    "could not verify password",
                    e,
                ));
            }
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| AppError::internal("session expiry out of range"))?;
        let session = self
            .sessions
            .create_session(credential.account_id, now, expires_at)
            .await
            .map_err(|e| internal("could not create session", e))?;

        let roles = self
            .roles
            .roles_for(credential.account_id)
            .await
            .map_err(|e| internal("could not resolve roles", e))?;

        let access = self
            .codec
            .issue_access(&credential.account_id.to_string(), &roles, self.access_ttl)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "could not issue access token", e))?;

        let refresh_token = self
            .codec
            .issue_refresh(session.id, session.created_at, session.expires_at)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "could not issue refresh token", e)
            })?;

        info!(
            account_id = %credential.account_id,
            session_id = %session.id,
            "Login successful"
        );

        Ok(IssuedTokens {
            access_token: access.token,
            refresh_token,
            access_expires_at: access.expires_at,
            refresh_expires_at: session.expires_at,
        })
    }

    /// Checks an access token and returns who it belongs to.
    pub async fn validate_access_token(&self, token: &str) -> AppResult<AccountSummary> {
        let claims = self
            .codec
            .parse_access(token)
            .map_err(|e| AppError::validation(format!("invalid access token: {e}")))?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(AppError::expired_token("access token has expired"));
        }

        let account_id = claims
            .account_id()
            .ok_or_else(|| AppError::validation("invalid access token: malformed subject"))?;

        let account = self
            .accounts
            .find_account_by_id(account_id)
            .await
            .map_err(|e| internal("could not get account", e))?
            .ok_or_else(|| AppError::validation("account no longer exists"))?;

        Ok(account.summary())
    }

    /// Issues a new access token from a refresh token whose session is still
    /// active. The refresh token is not rotated.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<RefreshedToken> {
        let claims = self
            .codec
            .parse_refresh(refresh_token)
            .map_err(|e| AppError::validation(format!("invalid refresh token: {e}")))?;

        let session = self
            .sessions
            .find_session(claims.sid)
            .await
            .map_err(|e| internal("could not get session", e))?
            .ok_or_else(|| AppError::validation("session not found"))?;

        let now = self.clock.now();
        let status = session.status_at(now);
        if !session.is_active_at(now) || claims.is_expired_at(now) {
            debug!(session_id = %session.id, status = %status, "Refresh refused");
            return Err(AppError::validation(format!("session is {status}")));
        }

        let roles = self
            .roles
            .roles_for(session.account_id)
            .await
            .map_err(|e| internal("could not resolve roles", e))?;

        let access = self
            .codec
            .issue_access(&session.account_id.to_string(), &roles, self.access_ttl)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "could not issue access token", e))?;

        debug!(session_id = %session.id, "Access token refreshed");
        Ok(RefreshedToken {
            access_token: access.token,
            access_expires_at: access.expires_at,
        })
    }

    /// Revokes the session a refresh token is bound to. Already revoked or
    /// expired sessions are left as they are.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let claims = self
            .codec
            .parse_refresh(refresh_token)
            .map_err(|e| AppError::validation(format!("invalid refresh token: {e}")))?;

        let revoked = self
            .sessions
            .revoke_session(claims.sid, self.clock.now())
            .await
            .map_err(|e| internal("could not revoke session", e))?;

        if revoked {
            info!(session_id = %claims.sid, "Session revoked");
        }
        Ok(())
    }

    /// Revokes every active session of an account. Returns how many were
    /// revoked.
    pub async fn revoke_all_sessions(&self, account_id: Uuid) -> AppResult<u64> {
        let count = self
            .sessions
            .revoke_all_for_account(account_id, self.clock.now())
            .await
            .map_err(|e| internal("could not revoke sessions", e))?;

        info!(account_id = %account_id, count, "Revoked all sessions");
        Ok(count)
    }

    async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "hashing task failed", e))?
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "could not hash password", e))
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<(), HashError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .unwrap_or_else(|e| Err(HashError::Hashing(e.to_string())))
    }

    async fn verify_dummy_blocking(&self, password: String) {
        let hasher = self.hasher.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}

fn email_taken(email: &str) -> AppError {
    AppError::validation(format!("email [{email}] is not available"))
}

fn internal(context: &str, source: AppError) -> AppError {
    error!(error = %source, "{context}");
    AppError::with_source(ErrorKind::Internal, context, source)
}
