//! In-memory repository for use-case review tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::use_case::{
    domain::{AuditEvent, UseCase, UseCaseId, UseCaseStatus},
    ports::{UseCaseRepository, UseCaseRepositoryError, UseCaseRepositoryResult},
};

/// Thread-safe in-memory use-case repository.
///
/// A single lock covers use cases and audit events so a transition and its
/// event become visible together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUseCaseRepository {
    state: Arc<RwLock<InMemoryUseCaseState>>,
}

#[derive(Debug, Default)]
struct InMemoryUseCaseState {
    use_cases: HashMap<UseCaseId, UseCase>,
    audit_events: HashMap<UseCaseId, Vec<AuditEvent>>,
}

impl InMemoryUseCaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> UseCaseRepositoryError {
    UseCaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UseCaseRepository for InMemoryUseCaseRepository {
    async fn store(&self, use_case: &UseCase, event: &AuditEvent) -> UseCaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.use_cases.contains_key(&use_case.id()) {
            return Err(UseCaseRepositoryError::DuplicateUseCase(use_case.id()));
        }
        state.use_cases.insert(use_case.id(), use_case.clone());
        state
            .audit_events
            .entry(use_case.id())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn commit_transition(
        &self,
        use_case: &UseCase,
        expected_status: UseCaseStatus,
        event: &AuditEvent,
    ) -> UseCaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .use_cases
            .get(&use_case.id())
            .ok_or(UseCaseRepositoryError::NotFound(use_case.id()))?;
        if stored.status() != expected_status {
            return Err(UseCaseRepositoryError::StatusConflict {
                use_case_id: use_case.id(),
                expected: expected_status,
            });
        }

        state.use_cases.insert(use_case.id(), use_case.clone());
        state
            .audit_events
            .entry(use_case.id())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UseCaseId) -> UseCaseRepositoryResult<Option<UseCase>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.use_cases.get(&id).cloned())
    }

    async fn list(&self, status: Option<UseCaseStatus>) -> UseCaseRepositoryResult<Vec<UseCase>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut use_cases: Vec<UseCase> = state
            .use_cases
            .values()
            .filter(|use_case| status.is_none_or(|wanted| use_case.status() == wanted))
            .cloned()
            .collect();
        use_cases.sort_by_key(|use_case| (use_case.created_at(), use_case.id().into_inner()));
        Ok(use_cases)
    }

    async fn audit_trail(&self, id: UseCaseId) -> UseCaseRepositoryResult<Vec<AuditEvent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.audit_events.get(&id).cloned().unwrap_or_default())
    }
}
