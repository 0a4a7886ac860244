//! Shared handler state.

use crate::attachment::adapters::InMemoryObjectStore;
use crate::attachment::domain::FilePolicy;
use crate::attachment::ports::ObjectStore;
use crate::attachment::services::AttachmentService;
use crate::finding::adapters::memory::InMemoryFindingRepository;
use crate::finding::ports::FindingRepository;
use crate::finding::services::RemediationService;
use crate::reference::ReferenceConfigSource;
use crate::use_case::adapters::memory::InMemoryUseCaseRepository;
use crate::use_case::ports::UseCaseRepository;
use crate::use_case::services::UseCaseReviewService;
use mockable::DefaultClock;
use std::sync::Arc;

/// Review service over a type-erased repository.
pub type ReviewService = UseCaseReviewService<dyn UseCaseRepository, DefaultClock>;

/// Finding service over a type-erased repository.
pub type FindingService = RemediationService<dyn FindingRepository, DefaultClock>;

/// Attachment service over type-erased ports.
pub type Attachments = AttachmentService<dyn UseCaseRepository, dyn ObjectStore>;

/// Services and sources shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub(super) reviews: ReviewService,
    pub(super) findings: FindingService,
    pub(super) attachments: Attachments,
    pub(super) reference: Arc<dyn ReferenceConfigSource>,
    pub(super) clock: Arc<DefaultClock>,
}

impl AppState {
    /// Wires the services over the given adapters.
    #[must_use]
    pub fn new(
        use_cases: Arc<dyn UseCaseRepository>,
        findings: Arc<dyn FindingRepository>,
        store: Arc<dyn ObjectStore>,
        reference: Arc<dyn ReferenceConfigSource>,
        policy: FilePolicy,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            reviews: UseCaseReviewService::new(Arc::clone(&use_cases), Arc::clone(&clock)),
            findings: RemediationService::new(findings, Arc::clone(&clock)),
            attachments: AttachmentService::new(use_cases, store, policy),
            reference,
            clock,
        }
    }

    /// Wires the services over fresh in-memory adapters.
    #[must_use]
    pub fn in_memory(reference: Arc<dyn ReferenceConfigSource>, policy: FilePolicy) -> Self {
        Self::new(
            Arc::new(InMemoryUseCaseRepository::new()),
            Arc::new(InMemoryFindingRepository::new()),
            Arc::new(InMemoryObjectStore::new()),
            reference,
            policy,
        )
    }
}
