//! Use-case lifecycle states and the review guard.

use super::{ParseUseCaseValueError, UseCaseDomainError, UseCaseId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Use-case lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseCaseStatus {
    /// Prepared by the owner but not yet submitted.
    Draft,
    /// Submitted and waiting for a reviewer.
    Submitted,
    /// A reviewer has picked the use case up.
    #[serde(rename = "Under Review")]
    UnderReview,
    /// Approved with a recorded risk tier.
    Approved,
    /// Returned to the owner for revision.
    #[serde(rename = "Sent Back")]
    SentBack,
}

impl UseCaseStatus {
    /// Every lifecycle state, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderReview,
        Self::Approved,
        Self::SentBack,
    ];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::SentBack => "Sent Back",
        }
    }

    /// Returns `true` when a reviewer may approve or send back.
    #[must_use]
    pub const fn is_reviewable(self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview)
    }
}

impl fmt::Display for UseCaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UseCaseStatus {
    type Error = ParseUseCaseValueError;

    /// Accepts the canonical form as well as snake or kebab case
    /// (`under_review`, `sent-back`), ignoring case.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "under review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "sent back" => Ok(Self::SentBack),
            _ => Err(ParseUseCaseValueError::new("use case status", value)),
        }
    }
}

/// Reviewer action evaluated by the lifecycle guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Approve the use case with its recorded risk tier.
    Approve,
    /// Return the use case to its owner.
    SendBack,
}

impl ReviewAction {
    /// Returns the state a successful action moves the use case into.
    #[must_use]
    pub const fn target_status(self) -> UseCaseStatus {
        match self {
            Self::Approve => UseCaseStatus::Approved,
            Self::SendBack => UseCaseStatus::SentBack,
        }
    }

    /// Decides whether the action is legal for the current state.
    ///
    /// `has_decision` only matters for [`ReviewAction::Approve`].
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::NotReviewable`] when `current` is not
    /// `Submitted` or `Under Review`, and
    /// [`UseCaseDomainError::MissingDecision`] when approving without a
    /// risk decision.
    pub const fn evaluate(
        self,
        use_case_id: UseCaseId,
        current: UseCaseStatus,
        has_decision: bool,
    ) -> Result<UseCaseStatus, UseCaseDomainError> {
        if !current.is_reviewable() {
            return Err(UseCaseDomainError::NotReviewable {
                use_case_id,
                status: current,
                action: self,
            });
        }
        if matches!(self, Self::Approve) && !has_decision {
            return Err(UseCaseDomainError::MissingDecision(use_case_id));
        }
        Ok(self.target_status())
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::SendBack => "send back",
        })
    }
}
