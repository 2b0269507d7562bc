//! Extractors that turn malformed input into `VALIDATION_ERROR` responses.
//!
//! Axum's own `Query` and `Json` rejections answer with plain text. These
//! wrappers keep the `{ code, message }` body for every client error.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use bedwatch_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Query string deserialized into `T`.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::Core(CoreError::validation("query", e.body_text()))
            })?;
        Ok(Self(value))
    }
}

/// JSON request body deserialized into `T`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                AppError::Core(CoreError::validation("body", e.body_text()))
            })?;
        Ok(Self(value))
    }
}
