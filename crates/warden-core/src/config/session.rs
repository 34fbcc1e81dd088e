//! Session lifetime configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours. Refresh tokens never outlive it.
    #[serde(default = "default_ttl")]
    pub ttl_hours: i64,
    /// Name of the cookie carrying the refresh token.
    #[serde(default = "default_cookie_name")]
    pub refresh_cookie_name: String,
    /// Mark the refresh cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub refresh_cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl(),
            refresh_cookie_name: default_cookie_name(),
            refresh_cookie_secure: false,
        }
    }
}

fn default_ttl() -> i64 {
    24
}

fn default_cookie_name() -> String {
    "refresh_token".to_string()
}
