//! Diesel row models for use-case persistence.

use super::schema::{use_case_audit_events, use_case_decisions, use_cases};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for use cases.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = use_cases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UseCaseRow {
    /// Use case identifier.
    pub id: uuid::Uuid,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Submitting owner.
    pub submitted_by: String,
    /// Lifecycle status.
    pub status: String,
    /// Reviewer who approved or sent back.
    pub reviewed_by: Option<String>,
    /// When the review action happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Notes from a send-back.
    pub reviewer_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for use cases.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = use_cases)]
pub struct NewUseCaseRow {
    /// Use case identifier.
    pub id: uuid::Uuid,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Submitting owner.
    pub submitted_by: String,
    /// Lifecycle status.
    pub status: String,
    /// Reviewer who approved or sent back.
    pub reviewed_by: Option<String>,
    /// When the review action happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Notes from a send-back.
    pub reviewer_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by a lifecycle transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = use_cases)]
#[diesel(treat_none_as_null = true)]
pub struct UseCaseTransitionChangeset {
    /// New lifecycle status.
    pub status: String,
    /// Reviewer who approved or sent back.
    pub reviewed_by: Option<String>,
    /// When the review action happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Notes from a send-back.
    pub reviewer_notes: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query and insert row for risk decisions.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = use_case_decisions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DecisionRow {
    /// Owning use case.
    pub use_case_id: uuid::Uuid,
    /// Risk tier.
    pub tier: String,
    /// Optional rationale.
    pub rationale: Option<String>,
    /// Recording reviewer.
    pub decided_by: String,
    /// Recording timestamp.
    pub decided_at: DateTime<Utc>,
}

/// Query and insert row for audit events.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = use_case_audit_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Owning use case.
    pub use_case_id: uuid::Uuid,
    /// Acting identity.
    pub actor: String,
    /// Event kind.
    pub event_type: String,
    /// Human-readable details.
    pub details: String,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}
