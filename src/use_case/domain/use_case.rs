//! Use-case aggregate root and its review transitions.

use super::{
    AuditEvent, AuditEventType, Decision, ReviewAction, RiskTier, UseCaseDomainError, UseCaseId,
    UseCaseStatus,
};
use crate::identity::Actor;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reviewer notes stored when a use case is sent back without notes.
pub const DEFAULT_SEND_BACK_NOTES: &str = "Sent back for revision";

/// Number of characters of send-back notes copied into the audit trail.
pub const SEND_BACK_DETAILS_LIMIT: usize = 100;

/// Use-case aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCase {
    id: UseCaseId,
    title: String,
    description: Option<String>,
    submitted_by: Actor,
    status: UseCaseStatus,
    reviewed_by: Option<Actor>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewer_notes: Option<String>,
    decision: Option<Decision>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUseCaseData {
    /// Persisted identifier.
    pub id: UseCaseId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Submitting owner.
    pub submitted_by: Actor,
    /// Persisted lifecycle state.
    pub status: UseCaseStatus,
    /// Reviewer who approved or sent back, if any.
    pub reviewed_by: Option<Actor>,
    /// When the review action happened, if any.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewer notes from a send-back, if any.
    pub reviewer_notes: Option<String>,
    /// Attached risk decision, if any.
    pub decision: Option<Decision>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated submission payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseSubmission {
    title: String,
    description: Option<String>,
}

impl UseCaseSubmission {
    /// Creates a submission with a required title.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, UseCaseDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UseCaseDomainError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
        })
    }

    /// Sets the description; blank descriptions are dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        self.description = (!value.trim().is_empty()).then_some(value);
        self
    }
}

impl UseCase {
    /// Submits a new use case for review.
    ///
    /// Returns the aggregate together with its `Submitted` audit event.
    #[must_use]
    pub fn submit(
        submission: UseCaseSubmission,
        owner: &Actor,
        clock: &impl Clock,
    ) -> (Self, AuditEvent) {
        let timestamp = clock.utc();
        let use_case = Self {
            id: UseCaseId::new(),
            title: submission.title,
            description: submission.description,
            submitted_by: owner.clone(),
            status: UseCaseStatus::Submitted,
            reviewed_by: None,
            reviewed_at: None,
            reviewer_notes: None,
            decision: None,
            created_at: timestamp,
            updated_at: timestamp,
        };
        let event = AuditEvent::record(
            use_case.id,
            owner,
            AuditEventType::Submitted,
            format!("Use case submitted: {}", use_case.title),
            clock,
        );
        (use_case, event)
    }

    /// Reconstructs a use case from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUseCaseData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            submitted_by: data.submitted_by,
            status: data.status,
            reviewed_by: data.reviewed_by,
            reviewed_at: data.reviewed_at,
            reviewer_notes: data.reviewer_notes,
            decision: data.decision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the use case identifier.
    #[must_use]
    pub const fn id(&self) -> UseCaseId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the submitting owner.
    #[must_use]
    pub const fn submitted_by(&self) -> &Actor {
        &self.submitted_by
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> UseCaseStatus {
        self.status
    }

    /// Returns the reviewer who approved or sent back, if any.
    #[must_use]
    pub const fn reviewed_by(&self) -> Option<&Actor> {
        self.reviewed_by.as_ref()
    }

    /// Returns when the use case was approved or sent back, if ever.
    #[must_use]
    pub const fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Returns the reviewer notes, if any.
    #[must_use]
    pub fn reviewer_notes(&self) -> Option<&str> {
        self.reviewer_notes.as_deref()
    }

    /// Returns the attached risk decision, if any.
    #[must_use]
    pub const fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a submitted use case into review.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::ReviewNotStartable`] unless the use case
    /// is `Submitted`.
    pub fn begin_review(
        &mut self,
        reviewer: &Actor,
        clock: &impl Clock,
    ) -> Result<AuditEvent, UseCaseDomainError> {
        if self.status != UseCaseStatus::Submitted {
            return Err(UseCaseDomainError::ReviewNotStartable {
                use_case_id: self.id,
                status: self.status,
            });
        }
        self.status = UseCaseStatus::UnderReview;
        self.touch(clock);
        Ok(self.audit(reviewer, AuditEventType::ReviewStarted, "Review started", clock))
    }

    /// Attaches or replaces the risk tier decision.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::DecisionNotAllowed`] unless the use case
    /// is `Submitted` or `Under Review`.
    pub fn record_decision(
        &mut self,
        tier: RiskTier,
        rationale: Option<String>,
        reviewer: &Actor,
        clock: &impl Clock,
    ) -> Result<AuditEvent, UseCaseDomainError> {
        if !self.status.is_reviewable() {
            return Err(UseCaseDomainError::DecisionNotAllowed {
                use_case_id: self.id,
                status: self.status,
            });
        }
        self.decision = Some(Decision {
            tier,
            rationale: rationale.filter(|text| !text.trim().is_empty()),
            decided_by: reviewer.clone(),
            decided_at: clock.utc(),
        });
        self.touch(clock);
        Ok(self.audit(
            reviewer,
            AuditEventType::DecisionRecorded,
            format!("Risk tier set to {tier}"),
            clock,
        ))
    }

    /// Approves the use case.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::NotReviewable`] outside `Submitted` and
    /// `Under Review`, or [`UseCaseDomainError::MissingDecision`] when no
    /// risk tier has been recorded.
    pub fn approve(
        &mut self,
        reviewer: &Actor,
        clock: &impl Clock,
    ) -> Result<AuditEvent, UseCaseDomainError> {
        let has_decision = self.decision.is_some();
        let next = ReviewAction::Approve.evaluate(self.id, self.status, has_decision)?;
        let Some(tier) = self.decision.as_ref().map(|decision| decision.tier) else {
            return Err(UseCaseDomainError::MissingDecision(self.id));
        };
        self.apply_review(next, reviewer, None, clock);
        Ok(self.audit(
            reviewer,
            AuditEventType::Approved,
            format!("Use case approved with {tier} risk tier"),
            clock,
        ))
    }

    /// Sends the use case back to its owner.
    ///
    /// Blank or missing notes are replaced by [`DEFAULT_SEND_BACK_NOTES`].
    /// The audit event carries at most [`SEND_BACK_DETAILS_LIMIT`]
    /// characters of the notes, followed by `...` when they were cut.
    ///
    /// # Errors
    ///
    /// Returns [`UseCaseDomainError::NotReviewable`] outside `Submitted` and
    /// `Under Review`.
    pub fn send_back(
        &mut self,
        notes: Option<String>,
        reviewer: &Actor,
        clock: &impl Clock,
    ) -> Result<AuditEvent, UseCaseDomainError> {
        let next = ReviewAction::SendBack.evaluate(self.id, self.status, self.decision.is_some())?;
        let stored_notes = notes
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SEND_BACK_NOTES.to_owned());
        let details = summarize_notes(&stored_notes);
        self.apply_review(next, reviewer, Some(stored_notes), clock);
        Ok(self.audit(reviewer, AuditEventType::SentBack, details, clock))
    }

    fn apply_review(
        &mut self,
        next: UseCaseStatus,
        reviewer: &Actor,
        notes: Option<String>,
        clock: &impl Clock,
    ) {
        let timestamp = clock.utc();
        self.status = next;
        self.reviewed_by = Some(reviewer.clone());
        self.reviewed_at = Some(timestamp);
        if notes.is_some() {
            self.reviewer_notes = notes;
        }
        self.updated_at = timestamp;
    }

    fn audit(
        &self,
        actor: &Actor,
        event_type: AuditEventType,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> AuditEvent {
        AuditEvent::record(self.id, actor, event_type, details, clock)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Cuts notes to the audit limit on character boundaries.
fn summarize_notes(notes: &str) -> String {
    let mut chars = notes.chars();
    let head: String = chars.by_ref().take(SEND_BACK_DETAILS_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
