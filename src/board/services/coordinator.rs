//! Optimistic move coordination with rollback-and-resync recovery.
//!
//! A move is applied to the local model before the store confirms it, so
//! observers see the new order immediately. If the commit fails or times
//! out, the local model is discarded and rebuilt from the store.

use super::{BoardConfig, BoardError, BoardResult};
use crate::board::{
    domain::{
        BacklogGate, BoardModel, ColumnView, GateRoute, MoveResolution, TaskId, TaskStatus,
        resolve_move,
    },
    ports::RankStore,
};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// A request to move a task to a position in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// Task to move.
    pub task_id: TaskId,
    /// Destination column.
    pub target_status: TaskStatus,
    /// Zero-based position in the destination column, counted without the
    /// moved task. Dropping onto empty column space means the column length.
    pub target_index: usize,
}

impl MoveRequest {
    /// Creates a move request.
    #[must_use]
    pub const fn new(task_id: TaskId, target_status: TaskStatus, target_index: usize) -> Self {
        Self {
            task_id,
            target_status,
            target_index,
        }
    }
}

/// Where the coordinator is in the lifecycle of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    /// No move is pending.
    Idle,
    /// A move is applied locally and awaiting commit.
    Applied {
        /// Task being moved.
        task_id: TaskId,
    },
    /// The last move failed and the model was rebuilt from the store.
    RolledBack {
        /// Task whose move did not stick.
        task_id: TaskId,
    },
}

/// Board state published to observers after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Ordered columns of the local model.
    pub view: ColumnView,
    /// Current move phase.
    pub phase: MovePhase,
}

/// Result of a successful move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied and committed.
    Confirmed(MoveResolution),
    /// The task already sat at the requested position; nothing was sent.
    Unchanged,
}

#[derive(Debug, Default)]
struct LocalBoard {
    model: BoardModel,
    stale: bool,
}

/// Orchestrates moves end to end against a [`RankStore`].
///
/// The coordinator owns the only writable copy of the local model. Move
/// requests are serialised through a fair lock, so concurrent callers queue
/// in arrival order and at most one move is in flight at a time.
pub struct OptimisticCoordinator<S, C>
where
    S: RankStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: BoardConfig,
    board: Mutex<LocalBoard>,
    snapshots: watch::Sender<BoardSnapshot>,
}

impl<S, C> OptimisticCoordinator<S, C>
where
    S: RankStore,
    C: Clock + Send + Sync,
{
    /// Loads the board from the store and creates a coordinator for it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ResyncFailed`] when the store cannot be read
    /// and [`BoardError::DataIntegrity`] when the stored board violates the
    /// ordering invariants.
    pub async fn load(store: Arc<S>, clock: Arc<C>, config: BoardConfig) -> BoardResult<Self> {
        let tasks = store.load_all().await.map_err(BoardError::ResyncFailed)?;
        let model = BoardModel::new(tasks);
        let view = model.project();
        view.check_integrity().inspect_err(|err| {
            tracing::error!(error = %err, "stored board violates ordering invariants");
        })?;
        tracing::info!(tasks = view.len(), "board loaded");

        let (snapshots, _) = watch::channel(BoardSnapshot {
            view,
            phase: MovePhase::Idle,
        });
        Ok(Self {
            store,
            clock,
            config,
            board: Mutex::new(LocalBoard {
                model,
                stale: false,
            }),
            snapshots,
        })
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Subscribes to board snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshots.subscribe()
    }

    /// Returns the latest published snapshot without waiting for a pending
    /// move.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns the ordered columns of the local model.
    #[must_use]
    pub fn view(&self) -> ColumnView {
        self.snapshots.borrow().view.clone()
    }

    /// Moves a task, applying it locally before the store confirms.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] or
    /// [`BoardError::InvalidTargetIndex`] without touching any state, and
    /// [`BoardError::PersistenceFailure`] or
    /// [`BoardError::PersistenceTimeout`] after rolling the local model back
    /// to the store's contents. After a timeout the store is re-read again
    /// before the next move is resolved.
    pub async fn request_move(&self, request: MoveRequest) -> BoardResult<MoveOutcome> {
        let mut board = self.board.lock().await;
        if board.stale {
            self.reload(&mut board).await?;
        }

        let resolution = self.resolve(&board.model, request)?;
        if resolution.is_no_op() {
            tracing::debug!(task_id = %request.task_id, "move leaves board unchanged");
            return Ok(MoveOutcome::Unchanged);
        }

        board.model = board.model.apply(&resolution, &*self.clock);
        self.publish(&board.model, MovePhase::Applied {
            task_id: request.task_id,
        });
        tracing::debug!(
            task_id = %request.task_id,
            status = %request.target_status,
            rank = ?resolution.updated().rank,
            shifted = resolution.shifted().len(),
            "move applied optimistically"
        );

        let placements = resolution.placements();
        let commit = tokio::time::timeout(self.config.commit_timeout, self.store.commit(&placements));
        let failure = match commit.await {
            Ok(Ok(())) => {
                self.publish(&board.model, MovePhase::Idle);
                tracing::info!(
                    task_id = %request.task_id,
                    status = %request.target_status,
                    placements = placements.len(),
                    "move confirmed"
                );
                return Ok(MoveOutcome::Confirmed(resolution));
            }
            Ok(Err(err)) => BoardError::PersistenceFailure(err),
            Err(_) => BoardError::PersistenceTimeout(self.config.commit_timeout),
        };

        Err(self.roll_back(&mut board, request.task_id, failure).await)
    }

    /// Discards the local model and rebuilds it from the store.
    ///
    /// Tasks created by the producer since the last load appear in the
    /// backlog afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ResyncFailed`] when the store cannot be read
    /// and [`BoardError::DataIntegrity`] when the stored board violates the
    /// ordering invariants.
    pub async fn resync(&self) -> BoardResult<ColumnView> {
        let mut board = self.board.lock().await;
        self.reload(&mut board).await?;
        self.publish(&board.model, MovePhase::Idle);
        Ok(board.model.project())
    }

    fn resolve(&self, model: &BoardModel, request: MoveRequest) -> BoardResult<MoveResolution> {
        let task = model
            .find(request.task_id)
            .ok_or(BoardError::TaskNotFound(request.task_id))?;
        let column = model
            .project()
            .column_without(request.target_status, request.task_id);

        match BacklogGate::route(request.target_status) {
            GateRoute::Demote => {
                if request.target_index > column.len() {
                    return Err(BoardError::InvalidTargetIndex {
                        status: request.target_status,
                        index: request.target_index,
                        len: column.len(),
                    });
                }
                Ok(BacklogGate::demote(task))
            }
            GateRoute::Rank => Ok(resolve_move(
                task,
                request.target_status,
                request.target_index,
                &column,
                self.config.spacing,
            )?),
        }
    }

    async fn roll_back(
        &self,
        board: &mut LocalBoard,
        task_id: TaskId,
        failure: BoardError,
    ) -> BoardError {
        tracing::warn!(task_id = %task_id, error = %failure, "move failed, resyncing board");
        board.model = BoardModel::default();
        board.stale = true;

        let outcome = self.reload(board).await;
        if matches!(failure, BoardError::PersistenceTimeout(_)) {
            // The abandoned commit may still land; re-read before the next move.
            board.stale = true;
        }
        self.publish(&board.model, MovePhase::RolledBack { task_id });
        match outcome {
            Ok(()) => failure,
            Err(err) => err,
        }
    }

    async fn reload(&self, board: &mut LocalBoard) -> BoardResult<()> {
        let tasks = self.store.load_all().await.map_err(|err| {
            tracing::warn!(error = %err, "board resync failed, local model stale");
            BoardError::ResyncFailed(err)
        })?;
        board.model = BoardModel::new(tasks);
        board.stale = false;

        let view = board.model.project();
        tracing::info!(tasks = view.len(), "board resynced from store");
        view.check_integrity().map_err(|err| {
            tracing::error!(error = %err, "stored board violates ordering invariants");
            BoardError::DataIntegrity(err)
        })
    }

    fn publish(&self, model: &BoardModel, phase: MovePhase) {
        let view = model.project();
        self.snapshots
            .send_modify(|snapshot| *snapshot = BoardSnapshot { view, phase });
    }
}
