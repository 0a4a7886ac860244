//! Service layer for use-case submission and review.

use crate::identity::Actor;
use crate::use_case::{
    domain::{
        AuditEvent, RiskTier, UseCase, UseCaseDomainError, UseCaseId, UseCaseStatus,
        UseCaseSubmission,
    },
    ports::{UseCaseRepository, UseCaseRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for submitting a use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitUseCaseRequest {
    title: String,
    description: Option<String>,
}

impl SubmitUseCaseRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
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

/// Request payload for recording a risk tier decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecisionRequest {
    use_case_id: UseCaseId,
    tier: RiskTier,
    rationale: Option<String>,
}

impl RecordDecisionRequest {
    /// Creates a request for the given use case and tier.
    #[must_use]
    pub const fn new(use_case_id: UseCaseId, tier: RiskTier) -> Self {
        Self {
            use_case_id,
            tier,
            rationale: None,
        }
    }

    /// Sets the rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Request payload for sending a use case back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendBackRequest {
    use_case_id: UseCaseId,
    notes: Option<String>,
}

impl SendBackRequest {
    /// Creates a request without reviewer notes.
    #[must_use]
    pub const fn new(use_case_id: UseCaseId) -> Self {
        Self {
            use_case_id,
            notes: None,
        }
    }

    /// Sets the reviewer notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for use-case review operations.
#[derive(Debug, Error)]
pub enum UseCaseReviewError {
    /// No use case exists with the given identifier.
    #[error("use case {0} not found")]
    NotFound(UseCaseId),
    /// The lifecycle guard rejected the action.
    #[error(transparent)]
    Domain(#[from] UseCaseDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UseCaseRepositoryError),
}

/// Result type for use-case review service operations.
pub type UseCaseReviewResult<T> = Result<T, UseCaseReviewError>;

/// Use-case review orchestration service.
///
/// `R` may be unsized so the HTTP layer can hold `dyn UseCaseRepository`.
pub struct UseCaseReviewService<R, C>
where
    R: UseCaseRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for UseCaseReviewService<R, C>
where
    R: UseCaseRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> UseCaseReviewService<R, C>
where
    R: UseCaseRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new review service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Submits a new use case for review.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::Domain`] for a blank title and
    /// [`UseCaseReviewError::Repository`] when persistence fails.
    pub async fn submit(
        &self,
        request: SubmitUseCaseRequest,
        owner: &Actor,
    ) -> UseCaseReviewResult<UseCase> {
        let mut submission = UseCaseSubmission::new(request.title)?;
        if let Some(description) = request.description {
            submission = submission.with_description(description);
        }
        let (use_case, event) = UseCase::submit(submission, owner, &*self.clock);
        self.repository.store(&use_case, &event).await?;
        tracing::info!(use_case_id = %use_case.id(), actor = %owner, "use case submitted");
        Ok(use_case)
    }

    /// Retrieves a use case by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`] when the use case does not
    /// exist, or repository errors.
    pub async fn get(&self, id: UseCaseId) -> UseCaseReviewResult<UseCase> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UseCaseReviewError::NotFound(id))
    }

    /// Lists use cases, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list(&self, status: Option<UseCaseStatus>) -> UseCaseReviewResult<Vec<UseCase>> {
        Ok(self.repository.list(status).await?)
    }

    /// Returns the audit trail of a use case, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`] when the use case does not
    /// exist, or repository errors.
    pub async fn audit_trail(&self, id: UseCaseId) -> UseCaseReviewResult<Vec<AuditEvent>> {
        self.get(id).await?;
        Ok(self.repository.audit_trail(id).await?)
    }

    /// Moves a submitted use case into review.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`], guard rejections as
    /// [`UseCaseReviewError::Domain`], or repository errors including
    /// [`UseCaseRepositoryError::StatusConflict`].
    pub async fn begin_review(
        &self,
        id: UseCaseId,
        reviewer: &Actor,
    ) -> UseCaseReviewResult<UseCase> {
        self.transition(id, "begin review", |use_case, clock| {
            use_case.begin_review(reviewer, clock)
        })
        .await
    }

    /// Records or replaces the risk tier decision.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`], guard rejections as
    /// [`UseCaseReviewError::Domain`], or repository errors.
    pub async fn record_decision(
        &self,
        request: RecordDecisionRequest,
        reviewer: &Actor,
    ) -> UseCaseReviewResult<UseCase> {
        let RecordDecisionRequest {
            use_case_id,
            tier,
            rationale,
        } = request;
        self.transition(use_case_id, "record decision", |use_case, clock| {
            use_case.record_decision(tier, rationale, reviewer, clock)
        })
        .await
    }

    /// Approves a use case that is under review and has a risk decision.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`], guard rejections as
    /// [`UseCaseReviewError::Domain`], or repository errors.
    pub async fn approve(&self, id: UseCaseId, reviewer: &Actor) -> UseCaseReviewResult<UseCase> {
        self.transition(id, "approve", |use_case, clock| {
            use_case.approve(reviewer, clock)
        })
        .await
    }

    /// Sends a use case back to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseReviewError::NotFound`], guard rejections as
    /// [`UseCaseReviewError::Domain`], or repository errors.
    pub async fn send_back(
        &self,
        request: SendBackRequest,
        reviewer: &Actor,
    ) -> UseCaseReviewResult<UseCase> {
        let SendBackRequest { use_case_id, notes } = request;
        self.transition(use_case_id, "send back", |use_case, clock| {
            use_case.send_back(notes, reviewer, clock)
        })
        .await
    }

    /// Loads the use case, applies `change`, and commits the new state with
    /// its audit event, predicated on the status that was loaded.
    async fn transition<F>(
        &self,
        id: UseCaseId,
        action: &'static str,
        change: F,
    ) -> UseCaseReviewResult<UseCase>
    where
        F: FnOnce(&mut UseCase, &C) -> Result<AuditEvent, UseCaseDomainError> + Send,
    {
        let mut use_case = self.get(id).await?;
        let observed = use_case.status();
        let event = change(&mut use_case, &*self.clock).inspect_err(|err| {
            tracing::warn!(use_case_id = %id, action, error = %err, "review action rejected");
        })?;
        self.repository
            .commit_transition(&use_case, observed, &event)
            .await?;
        tracing::info!(
            use_case_id = %id,
            action,
            actor = %event.actor(),
            from = %observed,
            to = %use_case.status(),
            "use case transition committed"
        );
        Ok(use_case)
    }
}
