//! Service-level errors for board moves.

use crate::board::{
    domain::{BoardIntegrityError, PlacementError, TaskId, TaskStatus},
    ports::RankStoreError,
};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`super::OptimisticCoordinator`].
///
/// `TaskNotFound` and `InvalidTargetIndex` are validation errors: nothing
/// was applied and the caller may retry with corrected input. Persistence
/// errors mean the optimistic move was rolled back and the local model was
/// rebuilt from the store.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The task is absent from the local model.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The target index lies beyond the destination column.
    #[error("target index {index} is out of bounds for '{status}' (length {len})")]
    InvalidTargetIndex {
        /// Destination column.
        status: TaskStatus,
        /// Requested index.
        index: usize,
        /// Destination column length without the moved task.
        len: usize,
    },

    /// No rank could be computed without overflowing.
    #[error("rank space exhausted in '{0}'")]
    RankSpaceExhausted(TaskStatus),

    /// The store rejected the commit; the move was rolled back.
    #[error("move was not persisted: {0}")]
    PersistenceFailure(#[source] RankStoreError),

    /// The store did not answer in time; the move was rolled back.
    #[error("move was not persisted within {0:?}")]
    PersistenceTimeout(Duration),

    /// The stored board violates its ordering invariants.
    #[error(transparent)]
    DataIntegrity(#[from] BoardIntegrityError),

    /// Re-reading the store failed; the local model is stale.
    #[error("board resync failed: {0}")]
    ResyncFailed(#[source] RankStoreError),
}

impl BoardError {
    /// Returns `true` for errors that forced a rollback.
    #[must_use]
    pub const fn is_rollback(&self) -> bool {
        matches!(
            self,
            Self::PersistenceFailure(_) | Self::PersistenceTimeout(_) | Self::ResyncFailed(_)
        )
    }
}

impl From<PlacementError> for BoardError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::InvalidTargetIndex { status, index, len } => {
                Self::InvalidTargetIndex { status, index, len }
            }
            PlacementError::RankSpaceExhausted(status) => Self::RankSpaceExhausted(status),
        }
    }
}

/// Result type for board move operations.
pub type BoardResult<T> = Result<T, BoardError>;
