//! Domain model for the use-case review lifecycle.
//!
//! Everything here is pure: no I/O, no persistence types. Time comes in
//! through a [`mockable::Clock`] and identity through an
//! [`Actor`](crate::identity::Actor).

mod audit;
mod decision;
mod error;
mod ids;
mod status;
mod use_case;

pub use audit::{AuditEvent, AuditEventType, PersistedAuditEvent};
pub use decision::{Decision, RiskTier};
pub use error::{ParseUseCaseValueError, UseCaseDomainError};
pub use ids::{AuditEventId, UseCaseId};
pub use status::{ReviewAction, UseCaseStatus};
pub use use_case::{
    DEFAULT_SEND_BACK_NOTES, PersistedUseCaseData, SEND_BACK_DETAILS_LIMIT, UseCase,
    UseCaseSubmission,
};
