//! When steps for use-case review BDD scenarios.

use super::world::{UseCaseReviewWorld, run_async};
use modelgate::use_case::services::SendBackRequest;
use rstest_bdd_macros::when;

#[when("the reviewer approves the use case")]
fn reviewer_approves(world: &mut UseCaseReviewWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let result = run_async(world.service.approve(id, &world.reviewer));
    world.record(result);
    Ok(())
}

#[when("the reviewer sends the use case back without notes")]
fn reviewer_sends_back_without_notes(world: &mut UseCaseReviewWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let result = run_async(
        world
            .service
            .send_back(SendBackRequest::new(id), &world.reviewer),
    );
    world.record(result);
    Ok(())
}

#[when("the reviewer sends the use case back with {length:usize} characters of notes")]
fn reviewer_sends_back_with_long_notes(
    world: &mut UseCaseReviewWorld,
    length: usize,
) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let notes = "n".repeat(length);
    let result = run_async(
        world
            .service
            .send_back(SendBackRequest::new(id).with_notes(notes), &world.reviewer),
    );
    world.record(result);
    Ok(())
}
