//! Password hashing.

pub mod hasher;

pub use hasher::{HashError, PasswordHasher};
