//! Domain model for validation findings and their remediation.

mod error;
mod finding;
mod ids;
mod severity;

pub use error::{FindingDomainError, ParseFindingValueError};
pub use finding::{NewFinding, PersistedFindingData, ValidationFinding};
pub use ids::{FindingId, ModelId, ValidationId};
pub use severity::{FindingSeverity, RemediationStatus};
