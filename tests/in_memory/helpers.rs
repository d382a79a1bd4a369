//! Shared fixtures for in-memory board tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::DateTime;
use mockable::DefaultClock;
use taskboard::board::{
    adapters::memory::InMemoryRankStore,
    domain::{PersistedTaskData, Placement, Rank, Task, TaskId, TaskPayload, TaskStatus},
    ports::{RankStore, RankStoreError, RankStoreResult},
    services::{BoardConfig, OptimisticCoordinator},
};

/// Coordinator type used across in-memory tests.
pub type TestCoordinator = OptimisticCoordinator<SwitchableStore, DefaultClock>;

/// Builds a persisted task with a deterministic creation time.
///
/// # Errors
///
/// Returns an error if the fixture timestamp or title is invalid.
pub fn placed(
    title: &str,
    status: TaskStatus,
    rank: Option<i64>,
    created: i64,
) -> Result<Task, eyre::Report> {
    let timestamp = DateTime::from_timestamp(created, 0)
        .ok_or_else(|| eyre::eyre!("invalid fixture timestamp {created}"))?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        status,
        rank: rank.map(Rank::new),
        payload: TaskPayload::new(title)?,
        created_at: timestamp,
        updated_at: timestamp,
    }))
}

/// In-memory store whose commits can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct SwitchableStore {
    /// Backing store holding the durable truth.
    pub inner: InMemoryRankStore,
    reject_commits: Arc<AtomicBool>,
}

impl SwitchableStore {
    /// Wraps a store pre-populated with tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            inner: InMemoryRankStore::with_tasks(tasks),
            reject_commits: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes subsequent commits fail (or succeed again).
    pub fn reject_commits(&self, reject: bool) {
        self.reject_commits.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl RankStore for SwitchableStore {
    async fn store(&self, task: &Task) -> RankStoreResult<()> {
        self.inner.store(task).await
    }

    async fn load_all(&self) -> RankStoreResult<Vec<Task>> {
        self.inner.load_all().await
    }

    async fn find_by_id(&self, id: TaskId) -> RankStoreResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn commit(&self, placements: &[Placement]) -> RankStoreResult<()> {
        if self.reject_commits.load(Ordering::SeqCst) {
            return Err(RankStoreError::persistence(std::io::Error::other(
                "commit endpoint rejected the batch",
            )));
        }
        self.inner.commit(placements).await
    }
}

/// Loads a coordinator over the given store.
///
/// # Errors
///
/// Returns an error if the board cannot be loaded.
pub async fn coordinator(store: &SwitchableStore) -> Result<TestCoordinator, eyre::Report> {
    let coordinator = OptimisticCoordinator::load(
        Arc::new(store.clone()),
        Arc::new(DefaultClock),
        BoardConfig::default(),
    )
    .await?;
    Ok(coordinator)
}

/// Returns the stored rank of a task.
///
/// # Errors
///
/// Returns an error if the task is missing from the store.
pub async fn stored_rank(store: &SwitchableStore, id: TaskId) -> Result<Option<i64>, eyre::Report> {
    let task = store
        .inner
        .find_by_id(id)
        .await?
        .ok_or_else(|| eyre::eyre!("task {id} missing from store"))?;
    Ok(task.rank().map(Rank::value))
}
