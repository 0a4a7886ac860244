//! Reference configuration: compliance rules, required artifacts and
//! validation cadence.
//!
//! The data is read from `rules.json`, `artifacts.json` and
//! `validation.json` and validated before it is served.

mod error;
mod model;
mod source;

pub use error::ReferenceConfigError;
pub use model::{ArtifactRequirement, ComplianceRule, ReferenceConfig, ValidationSettings};
pub use source::{
    ARTIFACTS_FILE, DirectoryReferenceSource, RULES_FILE, ReferenceConfigSource,
    StaticReferenceSource, VALIDATION_FILE,
};
