//! Shared world state for use-case review BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use modelgate::identity::Actor;
use modelgate::use_case::{
    adapters::memory::InMemoryUseCaseRepository,
    domain::UseCase,
    services::{UseCaseReviewError, UseCaseReviewService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestReviewService = UseCaseReviewService<InMemoryUseCaseRepository, DefaultClock>;

/// Scenario world for use-case review behaviour tests.
pub struct UseCaseReviewWorld {
    pub service: TestReviewService,
    pub reviewer: Actor,
    pub use_case: Option<UseCase>,
    pub last_result: Option<Result<UseCase, UseCaseReviewError>>,
}

impl UseCaseReviewWorld {
    /// Creates a world with an empty repository.
    #[must_use]
    pub fn new() -> Self {
        let service = UseCaseReviewService::new(
            Arc::new(InMemoryUseCaseRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            reviewer: Actor::default_reviewer(),
            use_case: None,
            last_result: None,
        }
    }

    /// Returns the use case under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no use case has been submitted yet.
    pub fn current(&self) -> Result<&UseCase, eyre::Report> {
        self.use_case
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing submitted use case in scenario world"))
    }

    /// Stores the outcome of a review action, keeping the use case current.
    pub fn record(&mut self, result: Result<UseCase, UseCaseReviewError>) {
        if let Ok(ref updated) = result {
            self.use_case = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for UseCaseReviewWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> UseCaseReviewWorld {
    UseCaseReviewWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
