//! Repository implementations for Warden entities.

pub mod account;
pub mod credential;
pub mod session;

pub use account::AccountRepository;
pub use credential::CredentialRepository;
pub use session::SessionRepository;
