//! `PostgreSQL` repository implementation for use-case storage.

use super::{
    models::{AuditEventRow, DecisionRow, NewUseCaseRow, UseCaseRow, UseCaseTransitionChangeset},
    schema::{use_case_audit_events, use_case_decisions, use_cases},
};
use crate::identity::Actor;
use crate::use_case::{
    domain::{
        AuditEvent, AuditEventId, AuditEventType, Decision, PersistedAuditEvent,
        PersistedUseCaseData, RiskTier, UseCase, UseCaseId, UseCaseStatus,
    },
    ports::{UseCaseRepository, UseCaseRepositoryError, UseCaseRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by use-case adapters.
pub type UseCasePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed use-case repository.
#[derive(Debug, Clone)]
pub struct PostgresUseCaseRepository {
    pool: UseCasePgPool,
}

impl PostgresUseCaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UseCasePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UseCaseRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UseCaseRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UseCaseRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UseCaseRepositoryError::persistence)?
    }
}

impl From<DieselError> for UseCaseRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl UseCaseRepository for PostgresUseCaseRepository {
    async fn store(&self, use_case: &UseCase, event: &AuditEvent) -> UseCaseRepositoryResult<()> {
        let use_case_id = use_case.id();
        let new_row = to_new_row(use_case);
        let event_row = to_event_row(event);

        self.run_blocking(move |connection| {
            connection.transaction::<_, UseCaseRepositoryError, _>(|tx| {
                diesel::insert_into(use_cases::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            UseCaseRepositoryError::DuplicateUseCase(use_case_id)
                        }
                        _ => UseCaseRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(use_case_audit_events::table)
                    .values(&event_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn commit_transition(
        &self,
        use_case: &UseCase,
        expected_status: UseCaseStatus,
        event: &AuditEvent,
    ) -> UseCaseRepositoryResult<()> {
        let use_case_id = use_case.id();
        let changeset = to_transition_changeset(use_case);
        let decision_row = use_case
            .decision()
            .map(|decision| to_decision_row(use_case_id, decision));
        let event_row = to_event_row(event);

        self.run_blocking(move |connection| {
            connection.transaction::<_, UseCaseRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    use_cases::table
                        .filter(use_cases::id.eq(use_case_id.into_inner()))
                        .filter(use_cases::status.eq(expected_status.as_str())),
                )
                .set(&changeset)
                .execute(tx)?;

                if updated == 0 {
                    let exists = diesel::select(diesel::dsl::exists(
                        use_cases::table.filter(use_cases::id.eq(use_case_id.into_inner())),
                    ))
                    .get_result::<bool>(tx)?;
                    return Err(if exists {
                        UseCaseRepositoryError::StatusConflict {
                            use_case_id,
                            expected: expected_status,
                        }
                    } else {
                        UseCaseRepositoryError::NotFound(use_case_id)
                    });
                }

                if let Some(row) = decision_row {
                    diesel::insert_into(use_case_decisions::table)
                        .values(&row)
                        .on_conflict(use_case_decisions::use_case_id)
                        .do_update()
                        .set((
                            use_case_decisions::tier.eq(excluded(use_case_decisions::tier)),
                            use_case_decisions::rationale
                                .eq(excluded(use_case_decisions::rationale)),
                            use_case_decisions::decided_by
                                .eq(excluded(use_case_decisions::decided_by)),
                            use_case_decisions::decided_at
                                .eq(excluded(use_case_decisions::decided_at)),
                        ))
                        .execute(tx)?;
                }

                diesel::insert_into(use_case_audit_events::table)
                    .values(&event_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: UseCaseId) -> UseCaseRepositoryResult<Option<UseCase>> {
        self.run_blocking(move |connection| {
            let Some(row) = use_cases::table
                .filter(use_cases::id.eq(id.into_inner()))
                .select(UseCaseRow::as_select())
                .first::<UseCaseRow>(connection)
                .optional()?
            else {
                return Ok(None);
            };
            let decision = use_case_decisions::table
                .filter(use_case_decisions::use_case_id.eq(id.into_inner()))
                .select(DecisionRow::as_select())
                .first::<DecisionRow>(connection)
                .optional()?;
            row_to_use_case(row, decision).map(Some)
        })
        .await
    }

    async fn list(&self, status: Option<UseCaseStatus>) -> UseCaseRepositoryResult<Vec<UseCase>> {
        self.run_blocking(move |connection| {
            let mut query = use_cases::table.into_boxed();
            if let Some(wanted) = status {
                query = query.filter(use_cases::status.eq(wanted.as_str()));
            }
            let rows = query
                .order((use_cases::created_at.asc(), use_cases::id.asc()))
                .select(UseCaseRow::as_select())
                .load::<UseCaseRow>(connection)?;

            let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
            let mut decisions: HashMap<uuid::Uuid, DecisionRow> = use_case_decisions::table
                .filter(use_case_decisions::use_case_id.eq_any(ids))
                .select(DecisionRow::as_select())
                .load::<DecisionRow>(connection)?
                .into_iter()
                .map(|row| (row.use_case_id, row))
                .collect();

            rows.into_iter()
                .map(|row| {
                    let decision = decisions.remove(&row.id);
                    row_to_use_case(row, decision)
                })
                .collect()
        })
        .await
    }

    async fn audit_trail(&self, id: UseCaseId) -> UseCaseRepositoryResult<Vec<AuditEvent>> {
        self.run_blocking(move |connection| {
            use_case_audit_events::table
                .filter(use_case_audit_events::use_case_id.eq(id.into_inner()))
                .order(use_case_audit_events::created_at.asc())
                .select(AuditEventRow::as_select())
                .load::<AuditEventRow>(connection)?
                .into_iter()
                .map(row_to_event)
                .collect()
        })
        .await
    }
}

fn to_new_row(use_case: &UseCase) -> NewUseCaseRow {
    NewUseCaseRow {
        id: use_case.id().into_inner(),
        title: use_case.title().to_owned(),
        description: use_case.description().map(ToOwned::to_owned),
        submitted_by: use_case.submitted_by().as_str().to_owned(),
        status: use_case.status().as_str().to_owned(),
        reviewed_by: use_case.reviewed_by().map(|actor| actor.as_str().to_owned()),
        reviewed_at: use_case.reviewed_at(),
        reviewer_notes: use_case.reviewer_notes().map(ToOwned::to_owned),
        created_at: use_case.created_at(),
        updated_at: use_case.updated_at(),
    }
}

fn to_transition_changeset(use_case: &UseCase) -> UseCaseTransitionChangeset {
    UseCaseTransitionChangeset {
        status: use_case.status().as_str().to_owned(),
        reviewed_by: use_case.reviewed_by().map(|actor| actor.as_str().to_owned()),
        reviewed_at: use_case.reviewed_at(),
        reviewer_notes: use_case.reviewer_notes().map(ToOwned::to_owned),
        updated_at: use_case.updated_at(),
    }
}

fn to_decision_row(use_case_id: UseCaseId, decision: &Decision) -> DecisionRow {
    DecisionRow {
        use_case_id: use_case_id.into_inner(),
        tier: decision.tier.as_str().to_owned(),
        rationale: decision.rationale.clone(),
        decided_by: decision.decided_by.as_str().to_owned(),
        decided_at: decision.decided_at,
    }
}

fn to_event_row(event: &AuditEvent) -> AuditEventRow {
    AuditEventRow {
        id: event.id().into_inner(),
        use_case_id: event.use_case_id().into_inner(),
        actor: event.actor().as_str().to_owned(),
        event_type: event.event_type().as_str().to_owned(),
        details: event.details().to_owned(),
        created_at: event.timestamp(),
    }
}

fn parse_actor(value: &str) -> UseCaseRepositoryResult<Actor> {
    Actor::new(value).map_err(UseCaseRepositoryError::persistence)
}

fn row_to_decision(row: DecisionRow) -> UseCaseRepositoryResult<Decision> {
    Ok(Decision {
        tier: RiskTier::try_from(row.tier.as_str()).map_err(UseCaseRepositoryError::persistence)?,
        rationale: row.rationale,
        decided_by: parse_actor(&row.decided_by)?,
        decided_at: row.decided_at,
    })
}

fn row_to_use_case(
    row: UseCaseRow,
    decision: Option<DecisionRow>,
) -> UseCaseRepositoryResult<UseCase> {
    let status =
        UseCaseStatus::try_from(row.status.as_str()).map_err(UseCaseRepositoryError::persistence)?;
    let reviewed_by = row.reviewed_by.as_deref().map(parse_actor).transpose()?;

    Ok(UseCase::from_persisted(PersistedUseCaseData {
        id: UseCaseId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        submitted_by: parse_actor(&row.submitted_by)?,
        status,
        reviewed_by,
        reviewed_at: row.reviewed_at,
        reviewer_notes: row.reviewer_notes,
        decision: decision.map(row_to_decision).transpose()?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_event(row: AuditEventRow) -> UseCaseRepositoryResult<AuditEvent> {
    let event_type = AuditEventType::try_from(row.event_type.as_str())
        .map_err(UseCaseRepositoryError::persistence)?;
    Ok(AuditEvent::from_persisted(PersistedAuditEvent {
        id: AuditEventId::from_uuid(row.id),
        use_case_id: UseCaseId::from_uuid(row.use_case_id),
        actor: parse_actor(&row.actor)?,
        event_type,
        details: row.details,
        timestamp: row.created_at,
    }))
}
