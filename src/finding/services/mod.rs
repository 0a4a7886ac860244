//! Application services for finding remediation.

mod remediation;

pub use remediation::{
    RecordFindingRequest, RemediateFindingRequest, RemediationError, RemediationResult,
    RemediationService,
};
