//! Read-side projection of the task set into ordered columns.

use super::{BoardIntegrityError, Rank, Task, TaskId, TaskStatus};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Per-column ordered view of a task set.
///
/// Ranked columns are sorted by ascending rank with ties broken by task
/// identifier, so the order is reproducible even while an optimistic move
/// has left two tasks sharing a rank. The backlog keeps creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnView {
    columns: BTreeMap<TaskStatus, Vec<Task>>,
}

impl ColumnView {
    /// Projects a full task set into ordered columns.
    ///
    /// Every status is present in the result, possibly empty.
    #[must_use]
    pub fn project(tasks: &[Task]) -> Self {
        let mut columns: BTreeMap<TaskStatus, Vec<Task>> = TaskStatus::ALL
            .iter()
            .map(|status| (*status, Vec::new()))
            .collect();
        for task in tasks {
            columns.entry(task.status()).or_default().push(task.clone());
        }
        for (status, members) in &mut columns {
            if status.is_ranked() {
                members.sort_by(ranked_order);
            } else {
                members.sort_by_key(Task::created_at);
            }
        }
        Self { columns }
    }

    /// Returns the ordered members of a column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Iterates over all columns in board order.
    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        self.columns
            .iter()
            .map(|(status, members)| (*status, members.as_slice()))
    }

    /// Returns the ordered members of a column without the given task.
    #[must_use]
    pub fn column_without(&self, status: TaskStatus, excluded: TaskId) -> Vec<Task> {
        self.column(status)
            .iter()
            .filter(|task| task.id() != excluded)
            .cloned()
            .collect()
    }

    /// Locates a task, returning its column and zero-based position.
    #[must_use]
    pub fn position_of(&self, task_id: TaskId) -> Option<(TaskStatus, usize)> {
        self.columns.iter().find_map(|(status, members)| {
            members
                .iter()
                .position(|task| task.id() == task_id)
                .map(|index| (*status, index))
        })
    }

    /// Returns the identifiers of a column in display order.
    #[must_use]
    pub fn ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.column(status).iter().map(Task::id).collect()
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Returns `true` when the view holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    /// Verifies the at-rest ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BoardIntegrityError::MissingRank`] when a ranked column
    /// holds an unranked task and [`BoardIntegrityError::DuplicateRank`] when
    /// two tasks in one column share a rank.
    pub fn check_integrity(&self) -> Result<(), BoardIntegrityError> {
        for (status, members) in self.columns() {
            if !status.is_ranked() {
                continue;
            }
            if let Some(unranked) = members.iter().find(|task| task.rank().is_none()) {
                return Err(BoardIntegrityError::MissingRank {
                    task_id: unranked.id(),
                    status,
                });
            }
            for pair in members.windows(2) {
                let [first, second] = pair else { continue };
                if let (Some(rank), true) = (first.rank(), first.rank() == second.rank()) {
                    return Err(BoardIntegrityError::DuplicateRank {
                        status,
                        rank,
                        first: first.id(),
                        second: second.id(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Total order used inside ranked columns.
///
/// Unranked tasks (an integrity violation) sort last so they stay visible.
pub(crate) fn ranked_order(left: &Task, right: &Task) -> Ordering {
    rank_key(left).cmp(&rank_key(right))
}

fn rank_key(task: &Task) -> (bool, Option<Rank>, TaskId) {
    (task.rank().is_none(), task.rank(), task.id())
}
