//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, SigningKeyConfig};
pub use self::database::{DatabaseConfig, StorageBackend};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Longest accepted access-token lifetime (one day).
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifetime settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `WARDEN__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WARDEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Rejects configurations that would make the service unusable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !(1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&self.auth.access_token_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must be between 1 and {MAX_ACCESS_TOKEN_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session.ttl_hours) {
            return Err(AppError::configuration(format!(
                "session.ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}"
            )));
        }
        if self
            .auth
            .retired_keys
            .iter()
            .any(|k| k.id == self.auth.jwt_key_id)
        {
            return Err(AppError::configuration(format!(
                "Retired key id '{}' collides with the active key id",
                self.auth.jwt_key_id
            )));
        }
        Ok(())
    }
}
