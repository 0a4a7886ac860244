//! Acting identity passed explicitly into every state-changing operation.
//!
//! Guards and services never assume who is acting. Callers resolve an
//! [`Actor`] (today from a request header, later from authentication) and
//! hand it in.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder identity used for review actions when no actor is supplied.
pub const DEFAULT_REVIEWER: &str = "Model Risk Manager";

/// Placeholder identity used for owner-side actions when no actor is supplied.
pub const DEFAULT_MODEL_OWNER: &str = "Model Owner";

/// Maximum stored length of an actor display name.
const MAX_ACTOR_LENGTH: usize = 255;

/// Error returned when an actor name fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActorError {
    /// The actor name is empty after trimming.
    #[error("actor name must not be empty")]
    Empty,
    /// The actor name exceeds the storage limit.
    #[error("actor name exceeds {MAX_ACTOR_LENGTH} characters")]
    TooLong,
}

/// Display identity of the person or system performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Creates a validated actor identity.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Empty`] for blank names and
    /// [`ActorError::TooLong`] when the trimmed name exceeds 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ActorError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ActorError::Empty);
        }
        if trimmed.chars().count() > MAX_ACTOR_LENGTH {
            return Err(ActorError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Placeholder reviewer identity.
    #[must_use]
    pub fn default_reviewer() -> Self {
        Self(DEFAULT_REVIEWER.to_owned())
    }

    /// Placeholder model-owner identity.
    #[must_use]
    pub fn default_model_owner() -> Self {
        Self(DEFAULT_MODEL_OWNER.to_owned())
    }

    /// Returns the identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Actor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
