//! Domain errors for validation findings.

use super::FindingId;
use thiserror::Error;

/// Errors raised by finding invariants and the remediation guard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FindingDomainError {
    /// The finding title is blank.
    #[error("finding title must not be empty")]
    EmptyTitle,

    /// Remediation notes are blank.
    #[error("remediation notes must not be empty")]
    EmptyRemediationNotes,

    /// The finding is already remediated.
    #[error("Finding has already been remediated")]
    AlreadyRemediated(FindingId),
}

/// Error returned when a stored or submitted finding value cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseFindingValueError {
    kind: &'static str,
    value: String,
}

impl ParseFindingValueError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
