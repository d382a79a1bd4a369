//! The backlog admission rule.

use super::{BoardDomainError, MoveResolution, Placement, Task, TaskStatus};

/// How a move request is routed before any rank is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRoute {
    /// The target is the backlog: clear the rank, skip rank resolution.
    Demote,
    /// The target is a ranked column: resolve a rank.
    Rank,
}

/// Couples task creation to the ordering model.
///
/// Tasks are born in the backlog without a rank and only receive one when
/// explicitly moved onto the board. Moving a task back to the backlog is
/// always allowed and drops its rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacklogGate;

impl BacklogGate {
    /// Routes a move by its target column.
    #[must_use]
    pub const fn route(target_status: TaskStatus) -> GateRoute {
        if target_status.is_ranked() {
            GateRoute::Rank
        } else {
            GateRoute::Demote
        }
    }

    /// Checks that a newly created task starts unranked in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CreatedOutsideBacklog`] or
    /// [`BoardDomainError::CreatedWithRank`] when the task was created on
    /// the board.
    pub fn admit_new(task: &Task) -> Result<(), BoardDomainError> {
        if task.status() != TaskStatus::Backlog {
            return Err(BoardDomainError::CreatedOutsideBacklog {
                task_id: task.id(),
                status: task.status(),
            });
        }
        if task.rank().is_some() {
            return Err(BoardDomainError::CreatedWithRank(task.id()));
        }
        Ok(())
    }

    /// Resolves a move into the backlog.
    #[must_use]
    pub const fn demote(task: &Task) -> MoveResolution {
        if matches!(task.status(), TaskStatus::Backlog) {
            return MoveResolution::unchanged(task);
        }
        MoveResolution::single(Placement {
            task_id: task.id(),
            status: TaskStatus::Backlog,
            rank: None,
        })
    }
}
