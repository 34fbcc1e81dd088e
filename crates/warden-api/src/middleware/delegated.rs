//! Delegated authentication for services placed behind Warden.
//!
//! A downstream service mounts [`require_remote_auth`] in front of its routes.
//! The middleware forwards the caller's `Authorization` header to Warden's
//! `/token/validate` endpoint and, on success, stores the returned
//! [`AccountSummary`] in the request extensions.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use warden_core::error::{AppError, ErrorKind};
use warden_entity::account::AccountSummary;

use crate::dto::response::ApiResponse;
use crate::extractors::parse_bearer;

/// HTTP request timeout for the validate call.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Longest rejection body quoted back to the caller.
pub const MAX_ERROR_BODY_BYTES: usize = 1024;

/// Client for a remote Warden validate endpoint.
///
/// Clone is cheap; the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct RemoteAuthenticator {
    client: Client,
    validate_url: Arc<str>,
}

impl RemoteAuthenticator {
    /// Creates an authenticator for `validate_url`
    /// (e.g. `http://auth:8080/token/validate`).
    pub fn new(validate_url: impl Into<String>) -> Result<Self, AppError> {
        Self::with_timeout(validate_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Same as [`RemoteAuthenticator::new`] with an explicit request timeout.
    pub fn with_timeout(
        validate_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

        Ok(Self {
            client,
            validate_url: Arc::from(validate_url.into()),
        })
    }

    /// Forwards `authorization` verbatim and returns the caller's summary.
    ///
    /// Any non-200 answer or transport failure is `Unauthorized`; the message
    /// carries at most [`MAX_ERROR_BODY_BYTES`] of the auth server's response
    /// body for diagnostics.
    pub async fn authenticate(&self, authorization: &str) -> Result<AccountSummary, AppError> {
        let response = self
            .client
            .get(self.validate_url.as_ref())
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Auth server unreachable");
                AppError::unauthorized(format!("Auth server error: {e}"))
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = read_error_body(response).await;
            debug!(status = status.as_u16(), "Auth server rejected token");
            return Err(AppError::unauthorized(format!("Auth server error: {body}")));
        }

        let envelope: ApiResponse<AccountSummary> = response
            .json()
            .await
            .map_err(|e| AppError::unauthorized(format!("Auth server error: {e}")))?;

        envelope
            .data
            .ok_or_else(|| AppError::unauthorized("Auth server error: empty response"))
    }
}

/// Reads the body chunk by chunk, stopping once the cap is reached.
async fn read_error_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    while body.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Failed to read auth server error body");
                break;
            }
        }
    }
    error_text(&body)
}

fn error_text(body: &[u8]) -> String {
    let end = body.len().min(MAX_ERROR_BODY_BYTES);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}

/// Axum middleware: 401 unless the remote auth server accepts the caller's
/// bearer token.
///
/// ```ignore
/// let auth = RemoteAuthenticator::new("http://auth:8080/token/validate")?;
/// let app = Router::new()
///     .route("/orders", get(list_orders))
///     .layer(axum::middleware::from_fn_with_state(auth, require_remote_auth));
/// ```
pub async fn require_remote_auth(
    State(auth): State<RemoteAuthenticator>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(h) => h.to_string(),
        None => return unauthorized("Authorization header is required"),
    };

    if parse_bearer(&header).is_none() {
        return unauthorized("Invalid Authorization header format");
    }

    match auth.authenticate(&header).await {
        Ok(summary) => {
            request.extensions_mut().insert(summary);
            next.run(request).await
        }
        Err(e) => unauthorized(&e.message),
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
