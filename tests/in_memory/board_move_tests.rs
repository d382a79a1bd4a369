//! Coordinator moves against the in-memory store.

use super::helpers::{SwitchableStore, coordinator, placed, stored_rank};
use taskboard::board::{
    domain::{ColumnView, TaskStatus},
    ports::{RankStore, RankStoreError},
    services::{BoardError, MoveOutcome, MovePhase, MoveRequest},
};

#[tokio::test(flavor = "multi_thread")]
async fn backlog_task_lands_between_neighbours_at_the_midpoint() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Todo, Some(10), 0)?;
    let b = placed("B", TaskStatus::Todo, Some(20), 1)?;
    let c = placed("C", TaskStatus::Todo, Some(30), 2)?;
    let d = placed("D", TaskStatus::Backlog, None, 3)?;
    let store = SwitchableStore::with_tasks(vec![a.clone(), b.clone(), c.clone(), d.clone()]);
    let board = coordinator(&store).await?;

    let outcome = board
        .request_move(MoveRequest::new(d.id(), TaskStatus::Todo, 1))
        .await?;

    let MoveOutcome::Confirmed(resolution) = outcome else {
        eyre::bail!("expected a confirmed move, got {outcome:?}");
    };
    eyre::ensure!(resolution.shifted().is_empty(), "no sibling should shift");
    eyre::ensure!(stored_rank(&store, d.id()).await? == Some(15), "D should hold rank 15");
    eyre::ensure!(
        board.view().ids(TaskStatus::Todo) == vec![a.id(), d.id(), b.id(), c.id()],
        "expected order A, D, B, C"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn adjacent_ranks_renumber_the_whole_column() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Todo, Some(10), 0)?;
    let b = placed("B", TaskStatus::Todo, Some(11), 1)?;
    let c = placed("C", TaskStatus::Backlog, None, 2)?;
    let store = SwitchableStore::with_tasks(vec![a.clone(), b.clone(), c.clone()]);
    let board = coordinator(&store).await?;

    board
        .request_move(MoveRequest::new(c.id(), TaskStatus::Todo, 1))
        .await?;

    eyre::ensure!(stored_rank(&store, a.id()).await? == Some(1024), "A renumbered");
    eyre::ensure!(stored_rank(&store, c.id()).await? == Some(2048), "C renumbered");
    eyre::ensure!(stored_rank(&store, b.id()).await? == Some(3072), "B renumbered");
    let stored = ColumnView::project(&store.load_all().await?);
    eyre::ensure!(stored.check_integrity().is_ok(), "no ties at rest");
    eyre::ensure!(
        stored.ids(TaskStatus::Todo) == vec![a.id(), c.id(), b.id()],
        "expected order A, C, B"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_commit_restores_the_stored_board() -> Result<(), eyre::Report> {
    let x = placed("X", TaskStatus::InProgress, Some(1024), 0)?;
    let y = placed("Y", TaskStatus::InProgress, Some(2048), 1)?;
    let z = placed("Z", TaskStatus::Done, Some(1024), 2)?;
    let store = SwitchableStore::with_tasks(vec![x.clone(), y, z]);
    let board = coordinator(&store).await?;
    store.reject_commits(true);

    let result = board
        .request_move(MoveRequest::new(x.id(), TaskStatus::Done, 1))
        .await;

    eyre::ensure!(
        matches!(result, Err(BoardError::PersistenceFailure(_))),
        "expected a persistence failure, got {result:?}"
    );
    let truth = ColumnView::project(&store.load_all().await?);
    eyre::ensure!(board.view() == truth, "local model must equal the stored board");
    eyre::ensure!(
        truth.position_of(x.id()) == Some((TaskStatus::InProgress, 0)),
        "X stays first in in-progress"
    );
    eyre::ensure!(truth.check_integrity().is_ok(), "no duplicate ranks in store");
    eyre::ensure!(
        board.snapshot().phase == MovePhase::RolledBack { task_id: x.id() },
        "phase reports the rollback"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_local_model_is_rebuilt_after_a_rank_collision() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Todo, Some(1024), 0)?;
    let intruder = placed("intruder", TaskStatus::Backlog, None, 1)?;
    let c = placed("C", TaskStatus::Backlog, None, 2)?;
    let store = SwitchableStore::with_tasks(vec![a, intruder.clone(), c.clone()]);
    let board = coordinator(&store).await?;

    // An out-of-band writer takes the tail slot behind the coordinator's back.
    store
        .inner
        .commit(&[taskboard::board::domain::Placement {
            task_id: intruder.id(),
            status: TaskStatus::Todo,
            rank: Some(taskboard::board::domain::Rank::new(2048)),
        }])
        .await?;

    let result = board
        .request_move(MoveRequest::new(c.id(), TaskStatus::Todo, 1))
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(BoardError::PersistenceFailure(RankStoreError::RankCollision { .. }))
        ),
        "expected a rank collision, got {result:?}"
    );
    let view = board.view();
    eyre::ensure!(
        view.position_of(intruder.id()) == Some((TaskStatus::Todo, 1)),
        "resynced model shows the out-of-band write"
    );
    eyre::ensure!(
        view.position_of(c.id()) == Some((TaskStatus::Backlog, 0)),
        "C snaps back to the backlog"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_leaves_board_and_store_untouched() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Todo, Some(1024), 0)?;
    let store = SwitchableStore::with_tasks(vec![a]);
    let board = coordinator(&store).await?;
    let before = store.load_all().await?;
    let missing = taskboard::board::domain::TaskId::new();

    let result = board
        .request_move(MoveRequest::new(missing, TaskStatus::Todo, 0))
        .await;

    eyre::ensure!(
        matches!(result, Err(BoardError::TaskNotFound(id)) if id == missing),
        "expected TaskNotFound, got {result:?}"
    );
    eyre::ensure!(store.load_all().await? == before, "store unchanged");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn repeating_a_position_changes_nothing() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Testing, Some(1024), 0)?;
    let b = placed("B", TaskStatus::Testing, Some(2048), 1)?;
    let store = SwitchableStore::with_tasks(vec![a, b.clone()]);
    let board = coordinator(&store).await?;
    let before = store.load_all().await?;
    // A no-op must not reach the store at all.
    store.reject_commits(true);

    let outcome = board
        .request_move(MoveRequest::new(b.id(), TaskStatus::Testing, 1))
        .await?;

    eyre::ensure!(outcome == MoveOutcome::Unchanged, "expected a no-op");
    eyre::ensure!(store.load_all().await? == before, "store unchanged");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn demotion_clears_rank_and_re_entry_assigns_a_fresh_one() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Done, Some(1024), 0)?;
    let b = placed("B", TaskStatus::Done, Some(2048), 1)?;
    let store = SwitchableStore::with_tasks(vec![a.clone(), b.clone()]);
    let board = coordinator(&store).await?;

    board
        .request_move(MoveRequest::new(a.id(), TaskStatus::Backlog, 0))
        .await?;
    eyre::ensure!(stored_rank(&store, a.id()).await?.is_none(), "demotion clears rank");
    eyre::ensure!(
        board.view().ids(TaskStatus::Done) == vec![b.id()],
        "A leaves the done column"
    );

    board
        .request_move(MoveRequest::new(a.id(), TaskStatus::Done, 1))
        .await?;
    eyre::ensure!(stored_rank(&store, a.id()).await? == Some(2048 + 1024), "A re-enters at the tail");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_on_empty_column_space_appends() -> Result<(), eyre::Report> {
    let a = placed("A", TaskStatus::Todo, Some(1024), 0)?;
    let b = placed("B", TaskStatus::Todo, Some(2048), 1)?;
    let c = placed("C", TaskStatus::InProgress, Some(1024), 2)?;
    let store = SwitchableStore::with_tasks(vec![a.clone(), b.clone(), c.clone()]);
    let board = coordinator(&store).await?;
    let column_length = board.view().column(TaskStatus::Todo).len();

    board
        .request_move(MoveRequest::new(c.id(), TaskStatus::Todo, column_length))
        .await?;

    eyre::ensure!(
        board.view().ids(TaskStatus::Todo) == vec![a.id(), b.id(), c.id()],
        "C appended after B"
    );
    eyre::ensure!(
        board.view().column(TaskStatus::InProgress).is_empty(),
        "C left in-progress"
    );
    Ok(())
}
