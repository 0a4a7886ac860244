//! Error types for use-case lifecycle validation and parsing.

use super::{ReviewAction, UseCaseId, UseCaseStatus};
use thiserror::Error;

/// Errors returned by the use-case lifecycle guard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UseCaseDomainError {
    /// The submission title is empty after trimming.
    #[error("use case title must not be empty")]
    EmptyTitle,

    /// A review action was requested from a status that cannot be reviewed.
    #[error(
        "cannot {action} use case {use_case_id}: status is '{status}', expected Submitted or Under Review"
    )]
    NotReviewable {
        /// Use case identifier.
        use_case_id: UseCaseId,
        /// Status observed when the action was requested.
        status: UseCaseStatus,
        /// Requested review action.
        action: ReviewAction,
    },

    /// Approval was requested before a risk decision was recorded.
    #[error("cannot approve use case {0}: no risk tier decision has been recorded")]
    MissingDecision(UseCaseId),

    /// Review can only start from `Submitted`.
    #[error("cannot start review of use case {use_case_id}: status is '{status}', expected Submitted")]
    ReviewNotStartable {
        /// Use case identifier.
        use_case_id: UseCaseId,
        /// Status observed when the review was requested.
        status: UseCaseStatus,
    },

    /// Decisions can only be recorded while the use case is under review.
    #[error(
        "cannot record a decision for use case {use_case_id}: status is '{status}', expected Submitted or Under Review"
    )]
    DecisionNotAllowed {
        /// Use case identifier.
        use_case_id: UseCaseId,
        /// Status observed when the decision was recorded.
        status: UseCaseStatus,
    },
}

/// Error returned while parsing use-case enumerations from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseUseCaseValueError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseUseCaseValueError {
    /// Creates a parse error for the given enumeration and input.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
