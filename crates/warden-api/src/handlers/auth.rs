//! Account handlers: register, login, logout.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use warden_core::config::SessionConfig;
use warden_core::error::AppError;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    state
        .service
        .register(&req.first_name, &req.last_name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MessageResponse::new("user registered"))),
    ))
}

/// POST /login
///
/// Returns both tokens in the body, the access token in the `Authorization`
/// response header, and the refresh token in an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<(CookieJar, HeaderMap, Json<ApiResponse<LoginResponse>>)> {
    let tokens = state.service.login(&req.email, &req.password).await?;

    let headers = bearer_header(&tokens.access_token)?;
    let jar = jar.add(refresh_cookie(&state.config.session, tokens.refresh_token.clone()));

    Ok((
        jar,
        headers,
        Json(ApiResponse::ok(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
    ))
}

/// POST /logout
///
/// Revokes the session behind the refresh token (body or cookie). The cookie
/// is cleared on every outcome, including a token that does not parse.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> (CookieJar, ApiResult<Json<ApiResponse<MessageResponse>>>) {
    let result = match refresh_token_from(&state.config.session, &jar, &body) {
        Ok(token) => state.service.logout(&token).await.map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };

    let cookie_name = state.config.session.refresh_cookie_name.clone();
    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));

    (
        jar,
        result.map(|()| Json(ApiResponse::ok(MessageResponse::new("logged out")))),
    )
}

/// `Authorization: Bearer <token>` as a response header map.
pub(crate) fn bearer_header(token: &str) -> Result<HeaderMap, AppError> {
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| AppError::internal(format!("token is not a valid header value: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

fn refresh_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.refresh_cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.refresh_cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Refresh token from a JSON body `{"refresh_token": "..."}`, falling back
/// to the configured cookie. A token sent explicitly in the body wins over a
/// possibly stale cookie.
pub(crate) fn refresh_token_from(
    config: &SessionConfig,
    jar: &CookieJar,
    body: &[u8],
) -> Result<String, AppError> {
    if !body.is_empty() {
        let req: RefreshRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("could not bind json: {e}")))?;
        if let Some(token) = req.refresh_token.filter(|t| !t.is_empty()) {
            return Ok(token);
        }
    }

    if let Some(cookie) = jar.get(&config.refresh_cookie_name) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    Err(AppError::unauthorized("refresh token is required"))
}
