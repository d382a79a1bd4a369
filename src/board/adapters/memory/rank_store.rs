//! In-memory rank store for tests and embedded use.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{BacklogGate, Placement, Rank, Task, TaskId, TaskStatus},
    ports::{RankStore, RankStoreError, RankStoreResult},
};

/// Thread-safe in-memory rank store.
///
/// Commits are validated against a copy of the task set and swapped in only
/// when every placement succeeds, so a rejected batch leaves no trace.
/// Committed placements are stamped with the store's clock.
pub struct InMemoryRankStore<C = DefaultClock> {
    state: Arc<RwLock<Vec<Task>>>,
    clock: Arc<C>,
}

impl InMemoryRankStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Creates a store pre-populated with tasks, bypassing the creation
    /// rule.
    ///
    /// Used to seed fixtures and to restore previously persisted boards.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self::with_clock(tasks, Arc::new(DefaultClock))
    }
}

impl<C: Clock> InMemoryRankStore<C> {
    /// Creates a pre-populated store that timestamps commits with `clock`.
    #[must_use]
    pub fn with_clock(tasks: Vec<Task>, clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(tasks)),
            clock,
        }
    }
}

impl Default for InMemoryRankStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryRankStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryRankStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRankStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn lock_error(err: impl ToString) -> RankStoreError {
    RankStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Finds the first rank shared by two tasks within a touched column.
fn find_collision(tasks: &[Task], touched: &BTreeSet<TaskStatus>) -> Option<RankStoreError> {
    let mut holders: HashMap<(TaskStatus, Rank), TaskId> = HashMap::new();
    for task in tasks {
        let status = task.status();
        if !status.is_ranked() || !touched.contains(&status) {
            continue;
        }
        let Some(rank) = task.rank() else { continue };
        if let Some(holder) = holders.insert((status, rank), task.id()) {
            return Some(RankStoreError::RankCollision {
                status,
                rank,
                holder,
            });
        }
    }
    None
}

#[async_trait]
impl<C: Clock + 'static> RankStore for InMemoryRankStore<C> {
    async fn store(&self, task: &Task) -> RankStoreResult<()> {
        BacklogGate::admit_new(task)?;
        let mut tasks = self.state.write().map_err(lock_error)?;
        if tasks.iter().any(|existing| existing.id() == task.id()) {
            return Err(RankStoreError::DuplicateTask(task.id()));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn load_all(&self) -> RankStoreResult<Vec<Task>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(tasks.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> RankStoreResult<Option<Task>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn commit(&self, placements: &[Placement]) -> RankStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        let mut staged = tasks.clone();
        let mut touched = BTreeSet::new();
        for placement in placements {
            let task = staged
                .iter_mut()
                .find(|task| task.id() == placement.task_id)
                .ok_or(RankStoreError::NotFound(placement.task_id))?;
            task.place(placement.status, placement.rank, &*self.clock);
            touched.insert(placement.status);
        }
        if let Some(collision) = find_collision(&staged, &touched) {
            return Err(collision);
        }
        *tasks = staged;
        Ok(())
    }
}
