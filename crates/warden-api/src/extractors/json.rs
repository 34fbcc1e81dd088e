//! JSON body extractor with envelope-shaped rejections.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use warden_core::error::AppError;

use crate::error::ApiError;

/// Like [`axum::Json`], but a body that does not parse or fails its
/// `validator` rules is rejected with a 400 in the standard envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("could not bind json: {}", e.body_text())))?;

        value.validate().map_err(|e| AppError::validation(e.to_string()))?;
        Ok(Self(value))
    }
}
