//! In-memory integration tests for finding remediation.

use super::helpers::{Workspace, owner, workspace};
use modelgate::finding::domain::{
    FindingDomainError, FindingSeverity, ModelId, RemediationStatus, ValidationId,
};
use modelgate::finding::services::{
    RecordFindingRequest, RemediateFindingRequest, RemediationError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finding_is_remediated_exactly_once(workspace: Workspace) -> Result<(), eyre::Report> {
    let model_id = ModelId::new();
    let validation_id = ValidationId::new();
    let finding = workspace
        .findings
        .record_finding(RecordFindingRequest::new(
            model_id,
            validation_id,
            "Back-testing window too short",
            FindingSeverity::High,
        ))
        .await?;

    let remediated = workspace
        .findings
        .remediate(
            RemediateFindingRequest::new(model_id, validation_id, finding.id(), "fixed"),
            &owner(),
        )
        .await?;
    let repeat = workspace
        .findings
        .remediate(
            RemediateFindingRequest::new(model_id, validation_id, finding.id(), "fixed again"),
            &owner(),
        )
        .await;

    eyre::ensure!(
        remediated.remediation_status() == RemediationStatus::Remediated,
        "finding not remediated"
    );
    eyre::ensure!(remediated.remediation_notes() == Some("fixed"), "notes mismatch");
    eyre::ensure!(remediated.remediated_at().is_some(), "timestamp missing");
    eyre::ensure!(
        matches!(
            repeat,
            Err(RemediationError::Domain(FindingDomainError::AlreadyRemediated(_)))
        ),
        "second remediation should be rejected, got {repeat:?}"
    );

    let stored = workspace.findings.list(model_id, validation_id).await?;
    let current = stored
        .first()
        .ok_or_else(|| eyre::eyre!("finding missing from listing"))?;
    eyre::ensure!(
        current.remediation_notes() == Some("fixed"),
        "rejected remediation overwrote notes"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn findings_are_scoped_to_their_validation(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let model_id = ModelId::new();
    let first_validation = ValidationId::new();
    let second_validation = ValidationId::new();
    for (validation_id, title) in [
        (first_validation, "Missing drift monitoring"),
        (first_validation, "Undocumented features"),
        (second_validation, "Stale training data"),
    ] {
        workspace
            .findings
            .record_finding(RecordFindingRequest::new(
                model_id,
                validation_id,
                title,
                FindingSeverity::Medium,
            ))
            .await?;
    }

    let first = workspace.findings.list(model_id, first_validation).await?;
    let second = workspace.findings.list(model_id, second_validation).await?;
    let other_model = workspace.findings.list(ModelId::new(), first_validation).await?;

    eyre::ensure!(first.len() == 2, "expected two findings, got {}", first.len());
    eyre::ensure!(second.len() == 1, "expected one finding, got {}", second.len());
    eyre::ensure!(other_model.is_empty(), "findings leaked across models");
    Ok(())
}
