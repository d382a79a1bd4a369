//! Error types for board domain validation, placement, and integrity checks.

use super::{Rank, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or admitting board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A newly created task must start in the backlog.
    #[error("task {task_id} must be created in the backlog, not '{status}'")]
    CreatedOutsideBacklog {
        /// Offending task.
        task_id: TaskId,
        /// Status the task was created with.
        status: TaskStatus,
    },

    /// A newly created task must not carry a rank.
    #[error("task {0} must not be created with a rank")]
    CreatedWithRank(TaskId),

    /// The configured rank step is not a positive integer.
    #[error("rank step must be positive, got {0}")]
    InvalidRankStep(i64),
}

/// Error returned while parsing task statuses at a trust boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Errors returned while computing a placement for a move.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// The requested index lies beyond the destination column.
    #[error("target index {index} is out of bounds for '{status}' (length {len})")]
    InvalidTargetIndex {
        /// Destination column.
        status: TaskStatus,
        /// Requested zero-based index.
        index: usize,
        /// Column length excluding the moved task.
        len: usize,
    },

    /// Rank arithmetic overflowed the integer range even after renumbering.
    #[error("rank space exhausted in '{0}'")]
    RankSpaceExhausted(TaskStatus),
}

/// Violations of the board ordering invariants observed at rest.
///
/// These indicate a bug or an out-of-band write and are never repaired
/// automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardIntegrityError {
    /// A stored status lies outside the fixed enumeration.
    #[error("task {task_id} has unknown status '{status}'")]
    UnknownStatus {
        /// Offending task.
        task_id: TaskId,
        /// Raw stored status.
        status: String,
    },

    /// Two tasks in the same ranked column share a rank.
    #[error("tasks {first} and {second} share rank {rank} in '{status}'")]
    DuplicateRank {
        /// Column holding the collision.
        status: TaskStatus,
        /// Shared rank value.
        rank: Rank,
        /// First colliding task.
        first: TaskId,
        /// Second colliding task.
        second: TaskId,
    },

    /// A task in a ranked column has no rank.
    #[error("task {task_id} in '{status}' has no rank")]
    MissingRank {
        /// Offending task.
        task_id: TaskId,
        /// Column the task sits in.
        status: TaskStatus,
    },
}
