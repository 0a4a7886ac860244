//! `PostgreSQL` tests for the use-case repository.

use super::helpers::{BoxError, PostgresContext, context};
use mockable::DefaultClock;
use modelgate::identity::Actor;
use modelgate::use_case::domain::{
    AuditEventType, RiskTier, UseCase, UseCaseStatus, UseCaseSubmission,
};
use modelgate::use_case::ports::{UseCaseRepository, UseCaseRepositoryError};
use rstest::rstest;

fn submitted(title: &str) -> Result<(UseCase, modelgate::use_case::domain::AuditEvent), BoxError> {
    let submission = UseCaseSubmission::new(title)?.with_description("Stored in PostgreSQL");
    Ok(UseCase::submit(
        submission,
        &Actor::default_model_owner(),
        &DefaultClock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_round_trips_with_decision_and_trail(
    #[future] context: Result<PostgresContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context.await?;
    let repository = context.use_cases();
    let reviewer = Actor::default_reviewer();
    let (mut use_case, submitted_event) = submitted("Claims triage")?;
    repository.store(&use_case, &submitted_event).await?;

    let decided = use_case.record_decision(
        RiskTier::High,
        Some("Automated denial".to_owned()),
        &reviewer,
        &DefaultClock,
    )?;
    repository
        .commit_transition(&use_case, UseCaseStatus::Submitted, &decided)
        .await?;
    let approved = use_case.approve(&reviewer, &DefaultClock)?;
    repository
        .commit_transition(&use_case, UseCaseStatus::Submitted, &approved)
        .await?;

    let stored = repository
        .find_by_id(use_case.id())
        .await?
        .ok_or("use case missing after approval")?;
    let trail = repository.audit_trail(use_case.id()).await?;
    let kinds: Vec<_> = trail.iter().map(|event| event.event_type()).collect();

    assert_eq!(stored.status(), UseCaseStatus::Approved);
    assert_eq!(stored.decision().map(|decision| decision.tier), Some(RiskTier::High));
    assert_eq!(stored.reviewed_by(), Some(&reviewer));
    assert_eq!(
        kinds,
        vec![
            AuditEventType::Submitted,
            AuditEventType::DecisionRecorded,
            AuditEventType::Approved,
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_status_is_a_conflict(
    #[future] context: Result<PostgresContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context.await?;
    let repository = context.use_cases();
    let reviewer = Actor::default_reviewer();
    let (use_case, submitted_event) = submitted("Chat assistant")?;
    repository.store(&use_case, &submitted_event).await?;

    let mut first = use_case.clone();
    let sent_back = first.send_back(None, &reviewer, &DefaultClock)?;
    repository
        .commit_transition(&first, UseCaseStatus::Submitted, &sent_back)
        .await?;

    let mut second = use_case;
    let started = second.begin_review(&reviewer, &DefaultClock)?;
    let result = repository
        .commit_transition(&second, UseCaseStatus::Submitted, &started)
        .await;

    assert!(matches!(
        result,
        Err(UseCaseRepositoryError::StatusConflict {
            expected: UseCaseStatus::Submitted,
            ..
        })
    ));
    let trail = repository.audit_trail(first.id()).await?;
    assert_eq!(trail.len(), 2, "conflicting transition must not be audited");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_stored_status(
    #[future] context: Result<PostgresContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context.await?;
    let repository = context.use_cases();
    for title in ["Pricing model", "Document summariser"] {
        let (use_case, event) = submitted(title)?;
        repository.store(&use_case, &event).await?;
    }

    let submitted_cases = repository.list(Some(UseCaseStatus::Submitted)).await?;
    let approved_cases = repository.list(Some(UseCaseStatus::Approved)).await?;

    assert_eq!(submitted_cases.len(), 2);
    assert!(approved_cases.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_audit_insert_rolls_back_the_transition(
    #[future] context: Result<PostgresContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context.await?;
    let repository = context.use_cases();
    let reviewer = Actor::default_reviewer();
    let (use_case, submitted_event) = submitted("Fraud scoring")?;
    repository.store(&use_case, &submitted_event).await?;

    let mut reviewed = use_case.clone();
    reviewed.begin_review(&reviewer, &DefaultClock)?;
    reviewed.record_decision(RiskTier::Medium, None, &reviewer, &DefaultClock)?;
    // Re-inserting the stored submission event violates the audit key after
    // the status update and decision upsert have run.
    let result = repository
        .commit_transition(&reviewed, UseCaseStatus::Submitted, &submitted_event)
        .await;

    assert!(
        matches!(result, Err(UseCaseRepositoryError::Persistence(_))),
        "unexpected result: {result:?}"
    );
    let stored = repository
        .find_by_id(use_case.id())
        .await?
        .ok_or("use case missing after failed transition")?;
    assert_eq!(stored.status(), UseCaseStatus::Submitted);
    assert!(stored.decision().is_none(), "decision upsert must roll back");
    assert_eq!(repository.audit_trail(use_case.id()).await?.len(), 1);
    Ok(())
}
