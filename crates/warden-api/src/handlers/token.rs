//! Token handlers: validate, refresh.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

use warden_entity::account::AccountSummary;

use crate::dto::response::{ApiResponse, RefreshResponse};
use crate::error::ApiResult;
use crate::extractors::BearerToken;
use crate::handlers::auth::{bearer_header, refresh_token_from};
use crate::state::AppState;

/// GET /token/validate
pub async fn validate(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<ApiResponse<AccountSummary>>> {
    let summary = state.service.validate_access_token(&token).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET|POST /token/refresh
///
/// The refresh token comes from a `{"refresh_token"}` body when one is sent,
/// otherwise from the cookie set at login.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> ApiResult<(HeaderMap, Json<ApiResponse<RefreshResponse>>)> {
    let token = refresh_token_from(&state.config.session, &jar, &body)?;
    let refreshed = state.service.refresh_access_token(&token).await?;

    Ok((
        bearer_header(&refreshed.access_token)?,
        Json(ApiResponse::ok(RefreshResponse {
            access_token: refreshed.access_token,
            access_expires_at: refreshed.access_expires_at,
        })),
    ))
}
