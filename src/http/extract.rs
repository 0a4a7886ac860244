//! Body and query extractors that reject with [`ApiError`].
//!
//! axum's own `Json` and `Query` reject with plain-text 415/422 responses;
//! these wrappers turn every rejection into a JSON 400.

use super::ApiError;
use axum::Json;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// JSON request body.
#[derive(Debug)]
pub(super) struct ApiJson<T>(pub(super) T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string.
#[derive(Debug)]
pub(super) struct ApiQuery<T>(pub(super) T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body that may be left out.
///
/// An empty or whitespace-only body, or a literal `null`, yields `None`.
/// Anything else must parse as `T`; the `Content-Type` header is not
/// required.
#[derive(Debug)]
pub(super) struct OptionalJson<T>(pub(super) Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }
        serde_json::from_slice::<Option<T>>(&bytes)
            .map(Self)
            .map_err(|err| ApiError::bad_request(format!("invalid JSON body: {err}")))
    }
}
