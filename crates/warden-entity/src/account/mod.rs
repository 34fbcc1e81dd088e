//! Account identity and login credential entities.

pub mod algorithm;
pub mod credential;
pub mod model;

pub use algorithm::HashAlgorithm;
pub use credential::{LoginCredential, NewCredential};
pub use model::{Account, AccountSummary, NewAccount};
