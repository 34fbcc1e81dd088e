//! # warden-entity
//!
//! Domain entity models for Warden. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod account;
pub mod session;

pub use account::credential::normalize_email;
pub use account::{
    Account, AccountSummary, HashAlgorithm, LoginCredential, NewAccount, NewCredential,
};
pub use session::{NewSession, Session, SessionStatus};
