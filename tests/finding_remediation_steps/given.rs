//! Given steps for finding remediation BDD scenarios.

use super::world::{RemediationWorld, run_async};
use eyre::WrapErr;
use modelgate::finding::domain::FindingSeverity;
use modelgate::finding::services::{RecordFindingRequest, RemediateFindingRequest};
use rstest_bdd_macros::given;

#[given(r#"an open "{severity}" finding titled "{title}""#)]
fn open_finding(
    world: &mut RemediationWorld,
    severity: String,
    title: String,
) -> Result<(), eyre::Report> {
    let parsed = FindingSeverity::try_from(severity.as_str())
        .map_err(|err| eyre::eyre!("invalid severity in scenario: {err}"))?;
    let finding = run_async(world.service.record_finding(RecordFindingRequest::new(
        world.model_id,
        world.validation_id,
        title,
        parsed,
    )))
    .wrap_err("record finding for remediation scenario")?;
    world.finding = Some(finding);
    Ok(())
}

#[given(r#"the finding has been remediated with notes "{notes}""#)]
fn finding_already_remediated(
    world: &mut RemediationWorld,
    notes: String,
) -> Result<(), eyre::Report> {
    let request = RemediateFindingRequest::new(
        world.model_id,
        world.validation_id,
        world.current()?.id(),
        notes,
    );
    let remediated = run_async(world.service.remediate(request, &world.owner))
        .wrap_err("remediate finding in scenario setup")?;
    world.finding = Some(remediated);
    Ok(())
}
