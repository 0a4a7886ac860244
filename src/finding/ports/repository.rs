//! Repository port for validation findings.

use crate::finding::domain::{FindingId, ValidationFinding, ValidationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for finding repository operations.
pub type FindingRepositoryResult<T> = Result<T, FindingRepositoryError>;

/// Finding persistence contract.
#[async_trait]
pub trait FindingRepository: Send + Sync {
    /// Stores a newly raised finding.
    ///
    /// # Errors
    ///
    /// Returns [`FindingRepositoryError::DuplicateFinding`] when the ID
    /// already exists.
    async fn store(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()>;

    /// Finds a finding by identifier.
    async fn find_by_id(&self, id: FindingId) -> FindingRepositoryResult<Option<ValidationFinding>>;

    /// Lists the findings of a validation, oldest first.
    async fn list_for_validation(
        &self,
        validation_id: ValidationId,
    ) -> FindingRepositoryResult<Vec<ValidationFinding>>;

    /// Persists a remediated finding.
    ///
    /// The write only applies while the stored finding is not yet
    /// remediated.
    ///
    /// # Errors
    ///
    /// Returns [`FindingRepositoryError::NotFound`] when the finding does not
    /// exist and [`FindingRepositoryError::AlreadyRemediated`] when another
    /// writer remediated it first.
    async fn mark_remediated(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()>;
}

/// Errors returned by finding repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FindingRepositoryError {
    /// A finding with the same identifier already exists.
    #[error("duplicate finding identifier: {0}")]
    DuplicateFinding(FindingId),

    /// The finding was not found.
    #[error("finding not found: {0}")]
    NotFound(FindingId),

    /// The stored finding was already remediated.
    #[error("Finding has already been remediated")]
    AlreadyRemediated(FindingId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FindingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
