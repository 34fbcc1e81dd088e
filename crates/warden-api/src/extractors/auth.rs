//! `BearerToken` extractor: pulls the token out of the Authorization header.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use warden_core::error::AppError;

use crate::error::ApiError;

/// Raw bearer token from `Authorization: Bearer <token>`.
///
/// Only the shape of the header is checked here; the token itself is
/// validated by the handler.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Splits an Authorization header value into its token. The scheme is
/// matched case-insensitively.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("authorization header is required"))?;

        let token = parse_bearer(header)
            .ok_or_else(|| AppError::unauthorized("invalid Authorization header format"))?;

        Ok(Self(token.to_string()))
    }
}
