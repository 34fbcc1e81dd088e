//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Given name.
    #[serde(rename = "firstname")]
    #[validate(length(min = 1, max = 100, message = "firstname is required"))]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastname")]
    #[validate(length(min = 1, max = 100, message = "lastname is required"))]
    pub last_name: String,
    /// Email address.
    #[validate(length(min = 1, max = 254, message = "email is required"))]
    pub email: String,
    /// Plaintext password; strength rules are applied by the service.
    #[validate(length(min = 1, max = 1024, message = "password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token refresh or logout request body, for clients that do not keep the
/// refresh cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}
