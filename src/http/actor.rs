//! Resolution of the acting identity from the `X-Actor` header.

use super::ApiError;
use crate::identity::Actor;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the acting identity.
pub const ACTOR_HEADER: &str = "x-actor";

/// Identity supplied with the request, if any.
///
/// A missing or blank header yields `None`; handlers then fall back to the
/// placeholder identity for their side of the workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestActor(Option<Actor>);

impl RequestActor {
    /// Returns the supplied actor or the placeholder reviewer.
    #[must_use]
    pub fn or_reviewer(self) -> Actor {
        self.0.unwrap_or_else(Actor::default_reviewer)
    }

    /// Returns the supplied actor or the placeholder model owner.
    #[must_use]
    pub fn or_model_owner(self) -> Actor {
        self.0.unwrap_or_else(Actor::default_model_owner)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Self(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| ApiError::bad_request("X-Actor header must be printable ASCII"))?;
        if raw.trim().is_empty() {
            return Ok(Self(None));
        }
        Actor::new(raw)
            .map(|actor| Self(Some(actor)))
            .map_err(|err| ApiError::bad_request(err.to_string()))
    }
}
