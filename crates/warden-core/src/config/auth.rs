//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and credential policy configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Key identifier written into the header of every token signed with
    /// `jwt_secret`.
    #[serde(default = "default_key_id")]
    pub jwt_key_id: String,
    /// Previously active keys. Tokens signed with them still verify, but
    /// nothing new is signed with them.
    #[serde(default)]
    pub retired_keys: Vec<SigningKeyConfig>,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Optional zxcvbn score floor (0-4). Unset disables the entropy check.
    #[serde(default)]
    pub password_min_score: Option<u8>,
    /// Roles granted to every account by the static role resolver.
    #[serde(default = "default_roles")]
    pub default_roles: Vec<String>,
}

/// A named HMAC secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct SigningKeyConfig {
    /// Key identifier (`kid` header value).
    pub id: String,
    /// HMAC secret.
    pub secret: String,
}

impl std::fmt::Debug for SigningKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyConfig")
            .field("id", &self.id)
            .field("secret", &"****")
            .finish()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_key_id", &self.jwt_key_id)
            .field("retired_keys", &self.retired_keys)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("password_min_length", &self.password_min_length)
            .field("password_min_score", &self.password_min_score)
            .field("default_roles", &self.default_roles)
            .finish_non_exhaustive()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_key_id: default_key_id(),
            retired_keys: Vec::new(),
            access_token_ttl_minutes: default_access_ttl(),
            password_min_length: default_password_min(),
            password_min_score: None,
            default_roles: default_roles(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_key_id() -> String {
    "primary".to_string()
}

fn default_access_ttl() -> i64 {
    15
}

fn default_password_min() -> usize {
    8
}

fn default_roles() -> Vec<String> {
    vec!["user".to_string()]
}
