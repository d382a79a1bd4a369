//! When steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::board::{
    domain::{TaskId, TaskStatus},
    services::MoveRequest,
};

fn request(world: &mut BoardMoveWorld, move_request: MoveRequest) -> Result<(), eyre::Report> {
    let result = run_async(world.board()?.request_move(move_request));
    world.last_move = Some(result);
    Ok(())
}

#[when(r#"task "{name}" is moved to "{status}" at index {index:usize}"#)]
fn move_task(
    world: &mut BoardMoveWorld,
    name: String,
    status: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let task_id = world.id_of(&name)?;
    let status = TaskStatus::try_from(status.as_str())?;
    request(world, MoveRequest::new(task_id, status, index))
}

#[when(r#"an unknown task is moved to "{status}" at index {index:usize}"#)]
fn move_unknown_task(
    world: &mut BoardMoveWorld,
    status: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(status.as_str())?;
    request(world, MoveRequest::new(TaskId::new(), status, index))
}
