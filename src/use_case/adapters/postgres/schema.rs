//! Diesel schema for use-case persistence.

diesel::table! {
    /// Submitted use cases and their review state.
    use_cases (id) {
        /// Use case identifier.
        id -> Uuid,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional long description.
        description -> Nullable<Text>,
        /// Submitting owner.
        #[max_length = 255]
        submitted_by -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Reviewer who approved or sent back.
        #[max_length = 255]
        reviewed_by -> Nullable<Varchar>,
        /// When the review action happened.
        reviewed_at -> Nullable<Timestamptz>,
        /// Notes from a send-back.
        reviewer_notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Zero-or-one risk decision per use case.
    use_case_decisions (use_case_id) {
        /// Owning use case.
        use_case_id -> Uuid,
        /// Risk tier.
        #[max_length = 20]
        tier -> Varchar,
        /// Optional rationale.
        rationale -> Nullable<Text>,
        /// Recording reviewer.
        #[max_length = 255]
        decided_by -> Varchar,
        /// Recording timestamp.
        decided_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail for use-case state changes.
    use_case_audit_events (id) {
        /// Event identifier.
        id -> Uuid,
        /// Owning use case.
        use_case_id -> Uuid,
        /// Acting identity.
        #[max_length = 255]
        actor -> Varchar,
        /// Event kind.
        #[max_length = 50]
        event_type -> Varchar,
        /// Human-readable details.
        details -> Text,
        /// Event timestamp.
        created_at -> Timestamptz,
    }
}
