//! Password hash algorithm tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which algorithm produced a stored password hash.
///
/// Stored next to every credential so that a future algorithm can be
/// introduced without invalidating hashes written by an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hash_algorithm", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Argon2id, PHC string format.
    Argon2id,
}

impl HashAlgorithm {
    /// Return the tag as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2id => "argon2id",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
