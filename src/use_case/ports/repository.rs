//! Repository port for use-case persistence and the audit trail.

use crate::use_case::domain::{AuditEvent, UseCase, UseCaseId, UseCaseStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for use-case repository operations.
pub type UseCaseRepositoryResult<T> = Result<T, UseCaseRepositoryError>;

/// Use-case persistence contract.
///
/// Every write takes the audit event produced by the domain transition and
/// persists it in the same transaction as the state change.
#[async_trait]
pub trait UseCaseRepository: Send + Sync {
    /// Stores a newly submitted use case with its submission event.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseRepositoryError::DuplicateUseCase`] when the ID
    /// already exists.
    async fn store(&self, use_case: &UseCase, event: &AuditEvent) -> UseCaseRepositoryResult<()>;

    /// Persists a lifecycle transition and its audit event atomically.
    ///
    /// The write only applies while the stored status still equals
    /// `expected_status`, the status the guard evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseRepositoryError::NotFound`] when the use case does
    /// not exist and [`UseCaseRepositoryError::StatusConflict`] when its
    /// stored status no longer matches `expected_status`.
    async fn commit_transition(
        &self,
        use_case: &UseCase,
        expected_status: UseCaseStatus,
        event: &AuditEvent,
    ) -> UseCaseRepositoryResult<()>;

    /// Finds a use case (with its decision) by identifier.
    ///
    /// Returns `None` when the use case does not exist.
    async fn find_by_id(&self, id: UseCaseId) -> UseCaseRepositoryResult<Option<UseCase>>;

    /// Lists use cases, oldest first, optionally filtered by status.
    async fn list(&self, status: Option<UseCaseStatus>) -> UseCaseRepositoryResult<Vec<UseCase>>;

    /// Returns the audit trail for a use case, oldest first.
    async fn audit_trail(&self, id: UseCaseId) -> UseCaseRepositoryResult<Vec<AuditEvent>>;
}

/// Errors returned by use-case repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UseCaseRepositoryError {
    /// A use case with the same identifier already exists.
    #[error("duplicate use case identifier: {0}")]
    DuplicateUseCase(UseCaseId),

    /// The use case was not found.
    #[error("use case not found: {0}")]
    NotFound(UseCaseId),

    /// The use case changed status after it was read.
    #[error("use case {use_case_id} is no longer '{expected}'; it was modified concurrently")]
    StatusConflict {
        /// Use case identifier.
        use_case_id: UseCaseId,
        /// Status the transition was evaluated against.
        expected: UseCaseStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UseCaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
