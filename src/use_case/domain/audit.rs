//! Append-only audit events recorded for every use-case state change.

use super::{AuditEventId, ParseUseCaseValueError, UseCaseId};
use crate::identity::Actor;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of state change captured by an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventType {
    /// The use case was submitted for review.
    Submitted,
    /// A reviewer started reviewing the use case.
    ReviewStarted,
    /// A risk tier decision was recorded.
    DecisionRecorded,
    /// The use case was approved.
    Approved,
    /// The use case was sent back to its owner.
    SentBack,
}

impl AuditEventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::ReviewStarted => "ReviewStarted",
            Self::DecisionRecorded => "DecisionRecorded",
            Self::Approved => "Approved",
            Self::SentBack => "SentBack",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AuditEventType {
    type Error = ParseUseCaseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Submitted" => Ok(Self::Submitted),
            "ReviewStarted" => Ok(Self::ReviewStarted),
            "DecisionRecorded" => Ok(Self::DecisionRecorded),
            "Approved" => Ok(Self::Approved),
            "SentBack" => Ok(Self::SentBack),
            _ => Err(ParseUseCaseValueError::new("audit event type", value)),
        }
    }
}

/// Immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    id: AuditEventId,
    use_case_id: UseCaseId,
    actor: Actor,
    event_type: AuditEventType,
    details: String,
    timestamp: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAuditEvent {
    /// Persisted event identifier.
    pub id: AuditEventId,
    /// Use case the event belongs to.
    pub use_case_id: UseCaseId,
    /// Acting identity.
    pub actor: Actor,
    /// Event kind.
    pub event_type: AuditEventType,
    /// Human-readable details.
    pub details: String,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub(super) fn record(
        use_case_id: UseCaseId,
        actor: &Actor,
        event_type: AuditEventType,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditEventId::new(),
            use_case_id,
            actor: actor.clone(),
            event_type,
            details: details.into(),
            timestamp: clock.utc(),
        }
    }

    /// Reconstructs an audit event from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAuditEvent) -> Self {
        Self {
            id: data.id,
            use_case_id: data.use_case_id,
            actor: data.actor,
            event_type: data.event_type,
            details: data.details,
            timestamp: data.timestamp,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> AuditEventId {
        self.id
    }

    /// Returns the owning use case identifier.
    #[must_use]
    pub const fn use_case_id(&self) -> UseCaseId {
        self.use_case_id
    }

    /// Returns the acting identity.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn event_type(&self) -> AuditEventType {
        self.event_type
    }

    /// Returns the event details.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Returns when the event happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
