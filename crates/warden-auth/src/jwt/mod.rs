//! Signed token issuance and parsing.

pub mod claims;
pub mod codec;
pub mod keys;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use codec::{SignedToken, TokenCodec, TokenError};
pub use keys::KeyRing;
