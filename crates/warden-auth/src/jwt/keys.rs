//! Signing key ring: one active key plus retired verification keys.

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

use warden_core::config::AuthConfig;

/// The key used for new tokens.
#[derive(Clone)]
pub struct ActiveKey {
    /// Key id written to the `kid` header.
    pub id: String,
    pub(crate) encoding: EncodingKey,
    pub(crate) decoding: DecodingKey,
}

/// Active signing key and retired verification keys, indexed by `kid`.
///
/// Rotating a secret means moving the old key to `retired` and installing a
/// new active key; tokens signed with the old key keep verifying until they
/// expire or the retired entry is removed.
#[derive(Clone)]
pub struct KeyRing {
    active: ActiveKey,
    retired: HashMap<String, DecodingKey>,
}

impl KeyRing {
    /// A ring with a single active key and nothing retired.
    pub fn new(kid: impl Into<String>, secret: &[u8]) -> Self {
        Self {
            active: ActiveKey {
                id: kid.into(),
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            },
            retired: HashMap::new(),
        }
    }

    /// Builds the ring from `auth.jwt_*` and `auth.retired_keys`.
    pub fn from_config(config: &AuthConfig) -> Self {
        let mut ring = Self::new(config.jwt_key_id.clone(), config.jwt_secret.as_bytes());
        for key in &config.retired_keys {
            ring = ring.with_retired(key.id.clone(), key.secret.as_bytes());
        }
        ring
    }

    /// Adds a verification-only key.
    pub fn with_retired(mut self, kid: impl Into<String>, secret: &[u8]) -> Self {
        self.retired
            .insert(kid.into(), DecodingKey::from_secret(secret));
        self
    }

    /// The key new tokens are signed with.
    pub fn active(&self) -> &ActiveKey {
        &self.active
    }

    /// Select the verification key for a token header.
    ///
    /// A missing `kid` selects the active key; an unknown one selects nothing.
    pub fn decoding_key(&self, kid: Option<&str>) -> Option<&DecodingKey> {
        match kid {
            None => Some(&self.active.decoding),
            Some(id) if id == self.active.id => Some(&self.active.decoding),
            Some(id) => self.retired.get(id),
        }
    }
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("active", &self.active.id)
            .field("retired", &self.retired.keys().collect::<Vec<_>>())
            .finish()
    }
}
