//! Validation finding aggregate and the remediation guard.

use super::{
    FindingDomainError, FindingId, FindingSeverity, ModelId, RemediationStatus, ValidationId,
};
use crate::identity::Actor;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Issue raised by a model validation that the model owner must remediate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    id: FindingId,
    model_id: ModelId,
    validation_id: ValidationId,
    title: String,
    severity: FindingSeverity,
    description: Option<String>,
    remediation_status: RemediationStatus,
    remediation_notes: Option<String>,
    remediated_at: Option<DateTime<Utc>>,
    remediated_by: Option<Actor>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFindingData {
    /// Persisted identifier.
    pub id: FindingId,
    /// Model the finding was raised against.
    pub model_id: ModelId,
    /// Validation that raised the finding.
    pub validation_id: ValidationId,
    /// Persisted title.
    pub title: String,
    /// Persisted severity.
    pub severity: FindingSeverity,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Remediation progress.
    pub remediation_status: RemediationStatus,
    /// Remediation notes, if remediated.
    pub remediation_notes: Option<String>,
    /// Remediation timestamp, if remediated.
    pub remediated_at: Option<DateTime<Utc>>,
    /// Remediating actor, if remediated.
    pub remediated_by: Option<Actor>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for raising a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFinding {
    model_id: ModelId,
    validation_id: ValidationId,
    title: String,
    severity: FindingSeverity,
    description: Option<String>,
}

impl NewFinding {
    /// Creates a finding payload.
    ///
    /// # Errors
    ///
    /// Returns [`FindingDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        model_id: ModelId,
        validation_id: ValidationId,
        title: impl Into<String>,
        severity: FindingSeverity,
    ) -> Result<Self, FindingDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FindingDomainError::EmptyTitle);
        }
        Ok(Self {
            model_id,
            validation_id,
            title: trimmed.to_owned(),
            severity,
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

impl ValidationFinding {
    /// Raises a new open finding.
    #[must_use]
    pub fn raise(finding: NewFinding, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: FindingId::new(),
            model_id: finding.model_id,
            validation_id: finding.validation_id,
            title: finding.title,
            severity: finding.severity,
            description: finding.description,
            remediation_status: RemediationStatus::Open,
            remediation_notes: None,
            remediated_at: None,
            remediated_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a finding from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFindingData) -> Self {
        Self {
            id: data.id,
            model_id: data.model_id,
            validation_id: data.validation_id,
            title: data.title,
            severity: data.severity,
            description: data.description,
            remediation_status: data.remediation_status,
            remediation_notes: data.remediation_notes,
            remediated_at: data.remediated_at,
            remediated_by: data.remediated_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the finding identifier.
    #[must_use]
    pub const fn id(&self) -> FindingId {
        self.id
    }

    /// Returns the model the finding belongs to.
    #[must_use]
    pub const fn model_id(&self) -> ModelId {
        self.model_id
    }

    /// Returns the validation that raised the finding.
    #[must_use]
    pub const fn validation_id(&self) -> ValidationId {
        self.validation_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> FindingSeverity {
        self.severity
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the remediation progress.
    #[must_use]
    pub const fn remediation_status(&self) -> RemediationStatus {
        self.remediation_status
    }

    /// Returns the remediation notes, if remediated.
    #[must_use]
    pub fn remediation_notes(&self) -> Option<&str> {
        self.remediation_notes.as_deref()
    }

    /// Returns when the finding was remediated.
    #[must_use]
    pub const fn remediated_at(&self) -> Option<DateTime<Utc>> {
        self.remediated_at
    }

    /// Returns who remediated the finding.
    #[must_use]
    pub const fn remediated_by(&self) -> Option<&Actor> {
        self.remediated_by.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the finding belongs to the given model validation.
    #[must_use]
    pub fn belongs_to(&self, model_id: ModelId, validation_id: ValidationId) -> bool {
        self.model_id == model_id && self.validation_id == validation_id
    }

    /// Marks the finding remediated.
    ///
    /// # Errors
    ///
    /// Returns [`FindingDomainError::AlreadyRemediated`] when the finding was
    /// already remediated, leaving it untouched, and
    /// [`FindingDomainError::EmptyRemediationNotes`] for blank notes.
    pub fn remediate(
        &mut self,
        notes: impl Into<String>,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), FindingDomainError> {
        if self.remediation_status == RemediationStatus::Remediated {
            return Err(FindingDomainError::AlreadyRemediated(self.id));
        }
        let raw = notes.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FindingDomainError::EmptyRemediationNotes);
        }
        let timestamp = clock.utc();
        self.remediation_status = RemediationStatus::Remediated;
        self.remediation_notes = Some(trimmed.to_owned());
        self.remediated_at = Some(timestamp);
        self.remediated_by = Some(actor.clone());
        self.updated_at = timestamp;
        Ok(())
    }
}
