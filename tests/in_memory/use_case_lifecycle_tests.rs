//! In-memory integration tests for the use-case review lifecycle.

use super::helpers::{Workspace, reviewer, submit, workspace};
use modelgate::presentation::use_case_badge;
use modelgate::use_case::domain::{
    AuditEventType, DEFAULT_SEND_BACK_NOTES, RiskTier, UseCaseDomainError, UseCaseStatus,
};
use modelgate::use_case::services::{RecordDecisionRequest, SendBackRequest, UseCaseReviewError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_ends_approved_with_complete_trail(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let use_case = submit(&workspace, "Claims triage assistant").await?;
    let reviewer = reviewer();

    workspace.reviews.begin_review(use_case.id(), &reviewer).await?;
    workspace
        .reviews
        .record_decision(
            RecordDecisionRequest::new(use_case.id(), RiskTier::Medium)
                .with_rationale("Customer-facing but reversible"),
            &reviewer,
        )
        .await?;
    let approved = workspace.reviews.approve(use_case.id(), &reviewer).await?;

    eyre::ensure!(approved.status() == UseCaseStatus::Approved, "not approved");
    eyre::ensure!(approved.reviewed_by() == Some(&reviewer), "reviewer not stamped");
    eyre::ensure!(
        use_case_badge(approved.status()).label == "Approved",
        "badge label mismatch"
    );

    let trail = workspace.reviews.audit_trail(use_case.id()).await?;
    let kinds: Vec<_> = trail.iter().map(|event| event.event_type()).collect();
    eyre::ensure!(
        kinds
            == vec![
                AuditEventType::Submitted,
                AuditEventType::ReviewStarted,
                AuditEventType::DecisionRecorded,
                AuditEventType::Approved,
            ],
        "unexpected trail {kinds:?}"
    );
    let approval = trail
        .last()
        .ok_or_else(|| eyre::eyre!("trail is empty"))?;
    eyre::ensure!(approval.details().contains("Medium"), "tier missing from details");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn send_back_from_submitted_uses_default_notes(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let use_case = submit(&workspace, "Marketing copy generator").await?;

    let sent_back = workspace
        .reviews
        .send_back(SendBackRequest::new(use_case.id()), &reviewer())
        .await?;

    eyre::ensure!(sent_back.status() == UseCaseStatus::SentBack, "not sent back");
    eyre::ensure!(
        sent_back.reviewer_notes() == Some(DEFAULT_SEND_BACK_NOTES),
        "default notes not stored"
    );
    let trail = workspace.reviews.audit_trail(use_case.id()).await?;
    let last = trail.last().ok_or_else(|| eyre::eyre!("trail is empty"))?;
    eyre::ensure!(last.details() == DEFAULT_SEND_BACK_NOTES, "details mismatch");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_use_case_cannot_be_reviewed_again(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let use_case = submit(&workspace, "Fraud scoring").await?;
    let reviewer = reviewer();
    workspace
        .reviews
        .record_decision(RecordDecisionRequest::new(use_case.id(), RiskTier::High), &reviewer)
        .await?;
    workspace.reviews.approve(use_case.id(), &reviewer).await?;

    let second_approval = workspace.reviews.approve(use_case.id(), &reviewer).await;
    let send_back = workspace
        .reviews
        .send_back(
            SendBackRequest::new(use_case.id()).with_notes("Too late"),
            &reviewer,
        )
        .await;

    eyre::ensure!(
        matches!(
            second_approval,
            Err(UseCaseReviewError::Domain(UseCaseDomainError::NotReviewable { .. }))
        ),
        "second approval should be rejected, got {second_approval:?}"
    );
    eyre::ensure!(
        matches!(
            send_back,
            Err(UseCaseReviewError::Domain(UseCaseDomainError::NotReviewable { .. }))
        ),
        "send back should be rejected, got {send_back:?}"
    );
    let trail = workspace.reviews.audit_trail(use_case.id()).await?;
    eyre::ensure!(trail.len() == 3, "rejected actions must not be audited");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_status(workspace: Workspace) -> Result<(), eyre::Report> {
    let first = submit(&workspace, "Document summariser").await?;
    submit(&workspace, "Call transcription").await?;
    workspace.reviews.begin_review(first.id(), &reviewer()).await?;

    let under_review = workspace
        .reviews
        .list(Some(UseCaseStatus::UnderReview))
        .await?;
    let everything = workspace.reviews.list(None).await?;

    eyre::ensure!(under_review.len() == 1, "expected one use case under review");
    eyre::ensure!(
        under_review.first().map(|use_case| use_case.id()) == Some(first.id()),
        "wrong use case under review"
    );
    eyre::ensure!(everything.len() == 2, "expected two use cases in total");
    Ok(())
}
