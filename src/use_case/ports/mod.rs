//! Port contracts for the use-case review lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.

pub mod repository;

pub use repository::{UseCaseRepository, UseCaseRepositoryError, UseCaseRepositoryResult};
