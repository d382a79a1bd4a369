//! Record-store port holding each task's column and rank.

use crate::board::domain::{
    BoardDomainError, BoardIntegrityError, Placement, Rank, Task, TaskId, TaskStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for rank store operations.
pub type RankStoreResult<T> = Result<T, RankStoreError>;

/// Durable storage for board tasks.
///
/// The store holds no ordering logic. It is the single source of truth that
/// the local board model is rebuilt from after a failed commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankStore: Send + Sync {
    /// Stores a newly created backlog task.
    ///
    /// # Errors
    ///
    /// Returns [`RankStoreError::DuplicateTask`] when the identifier exists
    /// and [`RankStoreError::Rejected`] when the task was not created in the
    /// backlog.
    async fn store(&self, task: &Task) -> RankStoreResult<()>;

    /// Returns every task on the board in creation order.
    async fn load_all(&self) -> RankStoreResult<Vec<Task>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> RankStoreResult<Option<Task>>;

    /// Commits a batch of placements atomically.
    ///
    /// Either every placement is applied or none is.
    ///
    /// # Errors
    ///
    /// Returns [`RankStoreError::NotFound`] when a placement names an
    /// unknown task, [`RankStoreError::RankCollision`] when the batch would
    /// leave two tasks sharing a rank, [`RankStoreError::BudgetExceeded`]
    /// when a bounded store abandons the batch, and
    /// [`RankStoreError::Persistence`] on infrastructure failure.
    async fn commit(&self, placements: &[Placement]) -> RankStoreResult<()>;
}

/// Errors returned by rank store implementations.
#[derive(Debug, Clone, Error)]
pub enum RankStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task violates the creation rule.
    #[error(transparent)]
    Rejected(#[from] BoardDomainError),

    /// Committing the batch would leave a rank shared within a column.
    #[error("rank {rank} in '{status}' is already held by task {holder}")]
    RankCollision {
        /// Column holding the collision.
        status: TaskStatus,
        /// Contested rank.
        rank: Rank,
        /// Task that keeps the rank.
        holder: TaskId,
    },

    /// The batch did not finish within the store's commit budget and was
    /// rolled back.
    #[error("commit abandoned after exceeding its {0:?} budget")]
    BudgetExceeded(Duration),

    /// Stored data violates the board invariants.
    #[error(transparent)]
    Integrity(#[from] BoardIntegrityError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RankStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
