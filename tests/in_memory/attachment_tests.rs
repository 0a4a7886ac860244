//! In-memory integration tests for use-case attachments.

use super::helpers::{Workspace, owner, submit, workspace};
use modelgate::attachment::domain::{FileRejection, ObjectKey};
use modelgate::attachment::services::AttachmentError;
use modelgate::use_case::domain::UseCaseId;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upload_list_and_delete(workspace: Workspace) -> Result<(), eyre::Report> {
    let use_case = submit(&workspace, "Contract clause extraction").await?;
    let contents = b"%PDF-1.7 model card".to_vec();

    let stored = workspace
        .attachments
        .upload(
            use_case.id(),
            "model-card.pdf",
            "application/pdf",
            &contents,
            &owner(),
        )
        .await?;
    let listed = workspace.attachments.list(use_case.id()).await?;

    eyre::ensure!(
        stored.key.as_str() == format!("use-cases/{}/model-card.pdf", use_case.id()),
        "unexpected key {}",
        stored.key
    );
    eyre::ensure!(listed == vec![stored.clone()], "listing mismatch");
    eyre::ensure!(
        workspace.store.contents(&stored.key)? == Some(contents),
        "stored bytes differ"
    );

    workspace
        .attachments
        .delete(use_case.id(), "model-card.pdf", &owner())
        .await?;
    eyre::ensure!(
        workspace.attachments.list(use_case.id()).await?.is_empty(),
        "attachment survived deletion"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disallowed_type_is_not_stored(workspace: Workspace) -> Result<(), eyre::Report> {
    let use_case = submit(&workspace, "Spreadsheet forecasting").await?;

    let result = workspace
        .attachments
        .upload(use_case.id(), "tool.exe", "application/x-msdownload", b"MZ", &owner())
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(AttachmentError::Rejected(FileRejection::TypeNotAllowed { .. }))
        ),
        "expected type rejection, got {result:?}"
    );
    let key = ObjectKey::attachment_prefix(use_case.id());
    eyre::ensure!(
        workspace.attachments.list(use_case.id()).await?.is_empty(),
        "rejected upload stored under {key}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_use_case_is_not_found(workspace: Workspace) {
    let result = workspace
        .attachments
        .upload(UseCaseId::new(), "notes.txt", "text/plain", b"hi", &owner())
        .await;

    assert!(matches!(result, Err(AttachmentError::UseCaseNotFound(_))));
}
