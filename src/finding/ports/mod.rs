//! Port contracts for finding persistence.

mod repository;

pub use repository::{FindingRepository, FindingRepositoryError, FindingRepositoryResult};
