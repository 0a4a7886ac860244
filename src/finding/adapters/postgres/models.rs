//! Diesel row models for validation findings.

use super::schema::validation_findings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for findings.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = validation_findings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FindingRow {
    /// Finding identifier.
    pub id: uuid::Uuid,
    /// Model inventory entry.
    pub model_id: uuid::Uuid,
    /// Raising validation.
    pub validation_id: uuid::Uuid,
    /// Short title.
    pub title: String,
    /// Severity.
    pub severity: String,
    /// Optional description.
    pub description: Option<String>,
    /// Remediation progress.
    pub remediation_status: String,
    /// Remediation notes.
    pub remediation_notes: Option<String>,
    /// Remediation timestamp.
    pub remediated_at: Option<DateTime<Utc>>,
    /// Remediating actor.
    pub remediated_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a finding is remediated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = validation_findings)]
pub struct RemediationChangeset {
    /// New remediation progress.
    pub remediation_status: String,
    /// Remediation notes.
    pub remediation_notes: Option<String>,
    /// Remediation timestamp.
    pub remediated_at: Option<DateTime<Utc>>,
    /// Remediating actor.
    pub remediated_by: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
