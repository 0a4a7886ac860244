//! Service layer for raising and remediating validation findings.

use crate::finding::{
    domain::{
        FindingDomainError, FindingId, FindingSeverity, ModelId, NewFinding, ValidationFinding,
        ValidationId,
    },
    ports::{FindingRepository, FindingRepositoryError},
};
use crate::identity::Actor;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for raising a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFindingRequest {
    model_id: ModelId,
    validation_id: ValidationId,
    title: String,
    severity: FindingSeverity,
    description: Option<String>,
}

impl RecordFindingRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        model_id: ModelId,
        validation_id: ValidationId,
        title: impl Into<String>,
        severity: FindingSeverity,
    ) -> Self {
        Self {
            model_id,
            validation_id,
            title: title.into(),
            severity,
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for remediating a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediateFindingRequest {
    model_id: ModelId,
    validation_id: ValidationId,
    finding_id: FindingId,
    notes: String,
}

impl RemediateFindingRequest {
    /// Creates a request addressing a finding under its model validation.
    #[must_use]
    pub fn new(
        model_id: ModelId,
        validation_id: ValidationId,
        finding_id: FindingId,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            model_id,
            validation_id,
            finding_id,
            notes: notes.into(),
        }
    }
}

/// Service-level errors for finding operations.
#[derive(Debug, Error)]
pub enum RemediationError {
    /// No finding exists under the addressed model validation.
    #[error("finding {0} not found")]
    NotFound(FindingId),
    /// The remediation guard rejected the request.
    #[error(transparent)]
    Domain(#[from] FindingDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FindingRepositoryError),
}

/// Result type for finding service operations.
pub type RemediationResult<T> = Result<T, RemediationError>;

/// Finding orchestration service.
pub struct RemediationService<R, C>
where
    R: FindingRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for RemediationService<R, C>
where
    R: FindingRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> RemediationService<R, C>
where
    R: FindingRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new remediation service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Raises a new open finding.
    ///
    /// # Errors
    ///
    /// Returns [`RemediationError::Domain`] for a blank title, or repository
    /// errors.
    pub async fn record_finding(
        &self,
        request: RecordFindingRequest,
    ) -> RemediationResult<ValidationFinding> {
        let mut new_finding = NewFinding::new(
            request.model_id,
            request.validation_id,
            request.title,
            request.severity,
        )?;
        if let Some(description) = request.description {
            new_finding = new_finding.with_description(description);
        }
        let finding = ValidationFinding::raise(new_finding, &*self.clock);
        self.repository.store(&finding).await?;
        tracing::info!(
            finding_id = %finding.id(),
            validation_id = %finding.validation_id(),
            severity = %finding.severity(),
            "finding recorded"
        );
        Ok(finding)
    }

    /// Lists the findings of a model validation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list(
        &self,
        model_id: ModelId,
        validation_id: ValidationId,
    ) -> RemediationResult<Vec<ValidationFinding>> {
        let findings = self.repository.list_for_validation(validation_id).await?;
        Ok(findings
            .into_iter()
            .filter(|finding| finding.belongs_to(model_id, validation_id))
            .collect())
    }

    /// Marks a finding remediated exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`RemediationError::NotFound`] when the finding does not exist
    /// under the addressed model validation,
    /// [`FindingDomainError::AlreadyRemediated`] (wrapped in
    /// [`RemediationError::Domain`]) when it was already remediated, or
    /// repository errors.
    pub async fn remediate(
        &self,
        request: RemediateFindingRequest,
        actor: &Actor,
    ) -> RemediationResult<ValidationFinding> {
        let RemediateFindingRequest {
            model_id,
            validation_id,
            finding_id,
            notes,
        } = request;
        let mut finding = self
            .repository
            .find_by_id(finding_id)
            .await?
            .filter(|finding| finding.belongs_to(model_id, validation_id))
            .ok_or(RemediationError::NotFound(finding_id))?;

        finding
            .remediate(notes, actor, &*self.clock)
            .inspect_err(|err| {
                tracing::warn!(%finding_id, actor = %actor, error = %err, "remediation rejected");
            })?;
        self.repository
            .mark_remediated(&finding)
            .await
            .map_err(|err| match err {
                FindingRepositoryError::AlreadyRemediated(id) => {
                    RemediationError::Domain(FindingDomainError::AlreadyRemediated(id))
                }
                FindingRepositoryError::NotFound(id) => RemediationError::NotFound(id),
                other => RemediationError::Repository(other),
            })?;
        tracing::info!(%finding_id, actor = %actor, "finding remediated");
        Ok(finding)
    }
}
