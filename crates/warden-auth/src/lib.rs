//! # warden-auth
//!
//! Credential and token lifecycle for Warden.
//!
//! ## Modules
//!
//! - `validate`: email shape and password rules
//! - `password`: Argon2id hashing and verification
//! - `jwt`: HS256 token codec with a rotating key ring
//! - `roles`: role resolution for access tokens
//! - `store`: persistence contract with Postgres and in-memory backends
//! - `service`: register, login, validate, refresh, logout

pub mod jwt;
pub mod password;
pub mod roles;
pub mod service;
pub mod store;
pub mod validate;

pub use jwt::{AccessClaims, KeyRing, RefreshClaims, TokenCodec, TokenError};
pub use password::{HashError, PasswordHasher};
pub use roles::{RoleResolver, StaticRoleResolver};
pub use service::{CredentialService, IssuedTokens, RefreshedToken};
pub use store::{AccountStore, MemoryAccountStore, MemorySessionStore, SessionStore};
pub use validate::{PasswordPolicy, PasswordRuleViolation, validate_email, validate_password};
