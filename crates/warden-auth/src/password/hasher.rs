//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use warden_entity::account::HashAlgorithm;

/// Failure modes of hashing and verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// The password does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
    /// The stored hash is not a parseable PHC string.
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
    /// The hashing primitive itself failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Fixed hash verified against on the unknown-email login path.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hashes and verifies passwords using Argon2id with the crate's default
/// cost parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Creates a new password hasher instance.
    ///
    /// The first call in a process also builds the dummy hash, so that the
    /// first unknown-email login does not pay for an extra hash.
    pub fn new() -> Self {
        dummy_hash();
        Self
    }

    /// The algorithm tag stored next to hashes produced by this hasher.
    pub fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Argon2id
    }

    /// Hashes a plaintext password with a fresh random salt.
    ///
    /// The output is a PHC string that embeds algorithm, parameters and salt.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    /// Verifies a plaintext password against a stored PHC hash in constant
    /// time.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::Malformed(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(HashError::Mismatch),
            Err(e) => Err(HashError::Malformed(e.to_string())),
        }
    }

    /// Runs a verification whose result is discarded, so that a login for an
    /// unknown email costs about as much as one with a wrong password.
    pub fn verify_dummy(&self, password: &str) {
        if let Some(hash) = dummy_hash() {
            let _ = self.verify(password, hash);
        }
    }
}

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| PasswordHasher.hash("warden-dummy-password").ok())
        .as_deref()
}
