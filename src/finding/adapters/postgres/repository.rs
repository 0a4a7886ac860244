//! `PostgreSQL` repository implementation for validation findings.

use super::{
    models::{FindingRow, RemediationChangeset},
    schema::validation_findings,
};
use crate::finding::{
    domain::{
        FindingId, FindingSeverity, ModelId, PersistedFindingData, RemediationStatus,
        ValidationFinding, ValidationId,
    },
    ports::{FindingRepository, FindingRepositoryError, FindingRepositoryResult},
};
use crate::identity::Actor;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by finding adapters.
pub type FindingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed finding repository.
#[derive(Debug, Clone)]
pub struct PostgresFindingRepository {
    pool: FindingPgPool,
}

impl PostgresFindingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FindingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> FindingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FindingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FindingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(FindingRepositoryError::persistence)?
    }
}

impl From<DieselError> for FindingRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl FindingRepository for PostgresFindingRepository {
    async fn store(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()> {
        let finding_id = finding.id();
        let row = to_row(finding);
        self.run_blocking(move |connection| {
            diesel::insert_into(validation_findings::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FindingRepositoryError::DuplicateFinding(finding_id)
                    }
                    _ => FindingRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: FindingId) -> FindingRepositoryResult<Option<ValidationFinding>> {
        self.run_blocking(move |connection| {
            validation_findings::table
                .filter(validation_findings::id.eq(id.into_inner()))
                .select(FindingRow::as_select())
                .first::<FindingRow>(connection)
                .optional()?
                .map(row_to_finding)
                .transpose()
        })
        .await
    }

    async fn list_for_validation(
        &self,
        validation_id: ValidationId,
    ) -> FindingRepositoryResult<Vec<ValidationFinding>> {
        self.run_blocking(move |connection| {
            validation_findings::table
                .filter(validation_findings::validation_id.eq(validation_id.into_inner()))
                .order((validation_findings::created_at.asc(), validation_findings::id.asc()))
                .select(FindingRow::as_select())
                .load::<FindingRow>(connection)?
                .into_iter()
                .map(row_to_finding)
                .collect()
        })
        .await
    }

    async fn mark_remediated(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()> {
        let finding_id = finding.id();
        let changeset = RemediationChangeset {
            remediation_status: finding.remediation_status().as_str().to_owned(),
            remediation_notes: finding.remediation_notes().map(ToOwned::to_owned),
            remediated_at: finding.remediated_at(),
            remediated_by: finding.remediated_by().map(|actor| actor.as_str().to_owned()),
            updated_at: finding.updated_at(),
        };

        self.run_blocking(move |connection| {
            connection.transaction::<_, FindingRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    validation_findings::table
                        .filter(validation_findings::id.eq(finding_id.into_inner()))
                        .filter(
                            validation_findings::remediation_status
                                .ne(RemediationStatus::Remediated.as_str()),
                        ),
                )
                .set(&changeset)
                .execute(tx)?;

                if updated == 0 {
                    let exists = diesel::select(diesel::dsl::exists(
                        validation_findings::table
                            .filter(validation_findings::id.eq(finding_id.into_inner())),
                    ))
                    .get_result::<bool>(tx)?;
                    return Err(if exists {
                        FindingRepositoryError::AlreadyRemediated(finding_id)
                    } else {
                        FindingRepositoryError::NotFound(finding_id)
                    });
                }
                Ok(())
            })
        })
        .await
    }
}

fn to_row(finding: &ValidationFinding) -> FindingRow {
    FindingRow {
        id: finding.id().into_inner(),
        model_id: finding.model_id().into_inner(),
        validation_id: finding.validation_id().into_inner(),
        title: finding.title().to_owned(),
        severity: finding.severity().as_str().to_owned(),
        description: finding.description().map(ToOwned::to_owned),
        remediation_status: finding.remediation_status().as_str().to_owned(),
        remediation_notes: finding.remediation_notes().map(ToOwned::to_owned),
        remediated_at: finding.remediated_at(),
        remediated_by: finding.remediated_by().map(|actor| actor.as_str().to_owned()),
        created_at: finding.created_at(),
        updated_at: finding.updated_at(),
    }
}

fn row_to_finding(row: FindingRow) -> FindingRepositoryResult<ValidationFinding> {
    let severity = FindingSeverity::try_from(row.severity.as_str())
        .map_err(FindingRepositoryError::persistence)?;
    let remediation_status = RemediationStatus::try_from(row.remediation_status.as_str())
        .map_err(FindingRepositoryError::persistence)?;
    let remediated_by = row
        .remediated_by
        .as_deref()
        .map(Actor::new)
        .transpose()
        .map_err(FindingRepositoryError::persistence)?;

    Ok(ValidationFinding::from_persisted(PersistedFindingData {
        id: FindingId::from_uuid(row.id),
        model_id: ModelId::from_uuid(row.model_id),
        validation_id: ValidationId::from_uuid(row.validation_id),
        title: row.title,
        severity,
        description: row.description,
        remediation_status,
        remediation_notes: row.remediation_notes,
        remediated_at: row.remediated_at,
        remediated_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
