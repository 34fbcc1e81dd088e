//! # warden-database
//!
//! PostgreSQL connection management and repositories for accounts,
//! login credentials and sessions.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
