//! Shared world state for finding remediation BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use modelgate::finding::{
    adapters::memory::InMemoryFindingRepository,
    domain::{ModelId, ValidationFinding, ValidationId},
    services::{RemediationError, RemediationService},
};
use modelgate::identity::Actor;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestRemediationService = RemediationService<InMemoryFindingRepository, DefaultClock>;

/// Scenario world for finding remediation behaviour tests.
pub struct RemediationWorld {
    pub service: TestRemediationService,
    pub owner: Actor,
    pub model_id: ModelId,
    pub validation_id: ValidationId,
    pub finding: Option<ValidationFinding>,
    pub last_result: Option<Result<ValidationFinding, RemediationError>>,
}

impl RemediationWorld {
    /// Creates a world for one model validation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: RemediationService::new(
                Arc::new(InMemoryFindingRepository::new()),
                Arc::new(DefaultClock),
            ),
            owner: Actor::default_model_owner(),
            model_id: ModelId::new(),
            validation_id: ValidationId::new(),
            finding: None,
            last_result: None,
        }
    }

    /// Returns the finding under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no finding has been recorded yet.
    pub fn current(&self) -> Result<&ValidationFinding, eyre::Report> {
        self.finding
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing recorded finding in scenario world"))
    }

    /// Reloads the finding under test from the service.
    ///
    /// # Errors
    ///
    /// Returns an error when the finding cannot be listed.
    pub fn reload(&self) -> Result<ValidationFinding, eyre::Report> {
        let id = self.current()?.id();
        let findings = run_async(self.service.list(self.model_id, self.validation_id))?;
        findings
            .into_iter()
            .find(|finding| finding.id() == id)
            .ok_or_else(|| eyre::eyre!("finding {id} missing from listing"))
    }
}

impl Default for RemediationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RemediationWorld {
    RemediationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
