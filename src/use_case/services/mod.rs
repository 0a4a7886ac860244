//! Application services for use-case review orchestration.

mod review;

pub use review::{
    RecordDecisionRequest, SendBackRequest, SubmitUseCaseRequest, UseCaseReviewError,
    UseCaseReviewResult, UseCaseReviewService,
};
