//! Diesel schema for validation findings.

diesel::table! {
    /// Findings raised by model validations.
    validation_findings (id) {
        /// Finding identifier.
        id -> Uuid,
        /// Model inventory entry.
        model_id -> Uuid,
        /// Raising validation.
        validation_id -> Uuid,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Severity.
        #[max_length = 20]
        severity -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Remediation progress.
        #[max_length = 20]
        remediation_status -> Varchar,
        /// Remediation notes.
        remediation_notes -> Nullable<Text>,
        /// Remediation timestamp.
        remediated_at -> Nullable<Timestamptz>,
        /// Remediating actor.
        #[max_length = 255]
        remediated_by -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
