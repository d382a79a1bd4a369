//! The local task-set model and its pure move application.

use super::{ColumnView, MoveResolution, Task, TaskId};
use mockable::Clock;

/// Snapshot of every task on one board.
///
/// Tasks are kept in creation order. The model is never mutated in place;
/// [`BoardModel::apply`] returns the successor model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardModel {
    tasks: Vec<Task>,
}

impl BoardModel {
    /// Creates a model from a full task set.
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Returns all tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn find(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Projects the model into ordered columns.
    #[must_use]
    pub fn project(&self) -> ColumnView {
        ColumnView::project(&self.tasks)
    }

    /// Returns the model that results from applying a resolved move.
    ///
    /// Placements naming unknown tasks are ignored. A no-op resolution
    /// yields an identical model.
    #[must_use]
    pub fn apply(&self, resolution: &MoveResolution, clock: &impl Clock) -> Self {
        let mut tasks = self.tasks.clone();
        if resolution.is_no_op() {
            return Self { tasks };
        }
        for placement in resolution.placements() {
            if let Some(task) = tasks.iter_mut().find(|task| task.id() == placement.task_id) {
                task.place(placement.status, placement.rank, clock);
            }
        }
        Self { tasks }
    }
}

impl From<Vec<Task>> for BoardModel {
    fn from(tasks: Vec<Task>) -> Self {
        Self::new(tasks)
    }
}
