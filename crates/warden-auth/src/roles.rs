//! Role resolution for issued access tokens.

use async_trait::async_trait;
use uuid::Uuid;

use warden_core::config::AuthConfig;
use warden_core::result::AppResult;

/// Maps an account to the roles embedded in its access tokens.
#[async_trait]
pub trait RoleResolver: Send + Sync + std::fmt::Debug {
    /// Roles for `account_id` at issuance time.
    async fn roles_for(&self, account_id: Uuid) -> AppResult<Vec<String>>;
}

/// Grants every account the same fixed list.
#[derive(Debug, Clone)]
pub struct StaticRoleResolver {
    roles: Vec<String>,
}

impl StaticRoleResolver {
    /// Resolver that always answers `roles`.
    pub fn new(roles: Vec<String>) -> Self {
        Self { roles }
    }

    /// Resolver answering `auth.default_roles`.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.default_roles.clone())
    }
}

#[async_trait]
impl RoleResolver for StaticRoleResolver {
    async fn roles_for(&self, _account_id: Uuid) -> AppResult<Vec<String>> {
        Ok(self.roles.clone())
    }
}
