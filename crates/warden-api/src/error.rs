//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use warden_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiResponse;

/// Wrapper that renders an [`AppError`] as an HTTP response.
///
/// `AppError` lives in `warden-core`, so the `IntoResponse` impl has to be on
/// a local type.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code and machine-readable code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::ExpiredToken => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Database | ErrorKind::Configuration | ErrorKind::Internal => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = status_for(err.kind);

        let message = if status.is_server_error() {
            tracing::error!(error = %err, source = ?err.source, "Internal server error");
            "internal server error".to_string()
        } else {
            err.message
        };

        (status, Json(ApiResponse::failure(error_code, message))).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
