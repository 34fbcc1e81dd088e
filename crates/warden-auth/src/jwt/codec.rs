//! HS256 token issuance and parsing against a [`KeyRing`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, decode_header, encode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use warden_core::Clock;

use super::claims::{AUDIENCE, AccessClaims, ISSUER, RefreshClaims, TokenType};
use super::keys::KeyRing;

/// Token encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Bad structure, signature, issuer, audience, type or key id.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The signer rejected the claims.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// A freshly signed token and the expiry it carries.
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// Compact JWS.
    pub token: String,
    /// Value of the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

/// Signs and parses access and refresh tokens.
///
/// Parsing verifies signature, issuer, audience and token type but not
/// expiry; callers decide expiry against their own clock.
#[derive(Clone)]
pub struct TokenCodec {
    keys: KeyRing,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Creates a codec over `keys`, reading time from `clock`.
    pub fn new(keys: KeyRing, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self {
            keys,
            clock,
            validation,
        }
    }

    /// Issues an access token for `subject` valid for `ttl`.
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn issue_access(
        &self,
        subject: &str,
        roles: &[String],
        ttl: Duration,
    ) -> Result<SignedToken, TokenError> {
        let now = self.clock.now().timestamp();
        let exp = now + ttl.num_seconds();
        let claims = AccessClaims {
            sub: subject.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            typ: TokenType::Access,
        };

        let token = self.sign(&claims)?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| TokenError::Signing(format!("expiry {exp} out of range")))?;
        Ok(SignedToken { token, expires_at })
    }

    /// Issues a refresh token bound to a session, copying its timestamps.
    pub fn issue_refresh(
        &self,
        session_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = RefreshClaims {
            sid: session_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            typ: TokenType::Refresh,
        };
        self.sign(&claims)
    }

    /// Verifies an access token and returns its claims, expired or not.
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.verify(token)?;
        if claims.typ != TokenType::Access {
            return Err(TokenError::Malformed("expected an access token".to_string()));
        }
        Ok(claims)
    }

    /// Verifies a refresh token and returns its claims, expired or not.
    pub fn parse_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.verify(token)?;
        if claims.typ != TokenType::Refresh {
            return Err(TokenError::Malformed("expected a refresh token".to_string()));
        }
        Ok(claims)
    }

    fn sign<T: serde::Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let active = self.keys.active();
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(active.id.clone());

        encode(&header, claims, &active.encoding).map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))?;
        let key = self
            .keys
            .decoding_key(header.kid.as_deref())
            .ok_or_else(|| {
                TokenError::Malformed(format!(
                    "unknown key id '{}'",
                    header.kid.as_deref().unwrap_or_default()
                ))
            })?;

        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }
}
