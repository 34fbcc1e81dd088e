//! Login credential entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::algorithm::HashAlgorithm;

/// Email + password hash pair, one-to-one with an account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginCredential {
    /// Owning account.
    pub account_id: Uuid,
    /// Normalised (trimmed, lower-cased) email. Unique across credentials.
    pub email: String,
    /// Encoded password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Algorithm that produced `password_hash`.
    pub hash_algorithm: HashAlgorithm,
}

/// Data required to create a credential for a freshly inserted account.
#[derive(Debug, Clone)]
pub struct NewCredential {
    /// Normalised email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Algorithm that produced `password_hash`.
    pub hash_algorithm: HashAlgorithm,
}

/// Normalises an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
