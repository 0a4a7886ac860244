//! In-memory finding repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::finding::{
    domain::{FindingId, RemediationStatus, ValidationFinding, ValidationId},
    ports::{FindingRepository, FindingRepositoryError, FindingRepositoryResult},
};

/// Thread-safe in-memory finding repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFindingRepository {
    findings: Arc<RwLock<HashMap<FindingId, ValidationFinding>>>,
}

impl InMemoryFindingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> FindingRepositoryError {
    FindingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FindingRepository for InMemoryFindingRepository {
    async fn store(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()> {
        let mut findings = self.findings.write().map_err(lock_error)?;
        if findings.contains_key(&finding.id()) {
            return Err(FindingRepositoryError::DuplicateFinding(finding.id()));
        }
        findings.insert(finding.id(), finding.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: FindingId) -> FindingRepositoryResult<Option<ValidationFinding>> {
        let findings = self.findings.read().map_err(lock_error)?;
        Ok(findings.get(&id).cloned())
    }

    async fn list_for_validation(
        &self,
        validation_id: ValidationId,
    ) -> FindingRepositoryResult<Vec<ValidationFinding>> {
        let findings = self.findings.read().map_err(lock_error)?;
        let mut matching: Vec<ValidationFinding> = findings
            .values()
            .filter(|finding| finding.validation_id() == validation_id)
            .cloned()
            .collect();
        matching.sort_by_key(|finding| (finding.created_at(), finding.id().into_inner()));
        Ok(matching)
    }

    async fn mark_remediated(&self, finding: &ValidationFinding) -> FindingRepositoryResult<()> {
        let mut findings = self.findings.write().map_err(lock_error)?;
        let stored = findings
            .get(&finding.id())
            .ok_or(FindingRepositoryError::NotFound(finding.id()))?;
        if stored.remediation_status() == RemediationStatus::Remediated {
            return Err(FindingRepositoryError::AlreadyRemediated(finding.id()));
        }
        findings.insert(finding.id(), finding.clone());
        Ok(())
    }
}
