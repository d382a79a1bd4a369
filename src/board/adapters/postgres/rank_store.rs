//! `PostgreSQL` rank store with transactional batch commits.

use super::{
    models::{BoardTaskRow, NewBoardTaskRow},
    schema::board_tasks,
};
use crate::board::{
    domain::{
        BacklogGate, BoardIntegrityError, PersistedTaskData, Placement, Rank, Task, TaskId,
        TaskPayload, TaskStatus,
    },
    ports::{RankStore, RankStoreError, RankStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::{Duration, Instant};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Default upper bound on a single commit, connection checkout included.
///
/// Sits below the coordinator's default commit timeout.
pub const DEFAULT_COMMIT_BUDGET: Duration = Duration::from_secs(4);

/// `PostgreSQL`-backed rank store.
///
/// Commits run on the blocking pool and outlive a caller that stops
/// waiting for them. Each commit is therefore bounded by a budget: the
/// connection checkout, every statement, and the final deadline check all
/// count against it, and a batch that overruns is rolled back. Keep the
/// budget below the coordinator's commit timeout so an abandoned move can
/// never land after the board has resynced.
#[derive(Debug, Clone)]
pub struct PostgresRankStore {
    pool: BoardPgPool,
    commit_budget: Duration,
}

impl PostgresRankStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self {
            pool,
            commit_budget: DEFAULT_COMMIT_BUDGET,
        }
    }

    /// Sets the commit budget.
    #[must_use]
    pub const fn with_commit_budget(mut self, commit_budget: Duration) -> Self {
        self.commit_budget = commit_budget;
        self
    }

    /// Returns the commit budget in use.
    #[must_use]
    pub const fn commit_budget(&self) -> Duration {
        self.commit_budget
    }

    async fn run_blocking<F, T>(&self, f: F) -> RankStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RankStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RankStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RankStoreError::persistence)?
    }
}

/// Failure raised inside a commit transaction.
///
/// Diesel requires the transaction error to absorb its own errors, so domain
/// rejections travel alongside them and are unwrapped after rollback.
#[derive(Debug)]
enum CommitFailure {
    Store(RankStoreError),
    Database(DieselError),
}

impl From<DieselError> for CommitFailure {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl From<CommitFailure> for RankStoreError {
    fn from(failure: CommitFailure) -> Self {
        match failure {
            CommitFailure::Store(err) => err,
            CommitFailure::Database(err) => Self::persistence(err),
        }
    }
}

#[async_trait]
impl RankStore for PostgresRankStore {
    async fn store(&self, task: &Task) -> RankStoreResult<()> {
        BacklogGate::admit_new(task)?;
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(board_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RankStoreError::DuplicateTask(task_id)
                    }
                    _ => RankStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn load_all(&self) -> RankStoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = board_tasks::table
                .order((board_tasks::created_at.asc(), board_tasks::id.asc()))
                .select(BoardTaskRow::as_select())
                .load::<BoardTaskRow>(connection)
                .map_err(RankStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> RankStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = board_tasks::table
                .filter(board_tasks::id.eq(id.into_inner()))
                .select(BoardTaskRow::as_select())
                .first::<BoardTaskRow>(connection)
                .optional()
                .map_err(RankStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn commit(&self, placements: &[Placement]) -> RankStoreResult<()> {
        let batch = placements.to_vec();
        let pool = self.pool.clone();
        let budget = self.commit_budget;
        let deadline = Instant::now() + budget;
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get_timeout(budget)
                .map_err(RankStoreError::persistence)?;
            connection
                .transaction::<_, CommitFailure, _>(|tx| {
                    bound_statements(tx, deadline, budget)?;
                    apply_batch(tx, &batch)?;
                    check_deadline(deadline, budget)
                })
                .map_err(RankStoreError::from)
        })
        .await
        .map_err(RankStoreError::persistence)?
    }
}

/// Caps every remaining statement of the transaction at the time left
/// before `deadline`.
fn bound_statements(
    connection: &mut PgConnection,
    deadline: Instant,
    budget: Duration,
) -> Result<(), CommitFailure> {
    check_deadline(deadline, budget)?;
    let remaining = deadline.saturating_duration_since(Instant::now());
    diesel::sql_query(format!(
        "SET LOCAL statement_timeout = {}",
        statement_timeout_millis(remaining)
    ))
    .execute(connection)?;
    Ok(())
}

fn check_deadline(deadline: Instant, budget: Duration) -> Result<(), CommitFailure> {
    if Instant::now() >= deadline {
        return Err(CommitFailure::Store(RankStoreError::BudgetExceeded(budget)));
    }
    Ok(())
}

/// `statement_timeout` in milliseconds; zero would disable the limit.
fn statement_timeout_millis(remaining: Duration) -> u128 {
    remaining.as_millis().max(1)
}

fn apply_batch(connection: &mut PgConnection, batch: &[Placement]) -> Result<(), CommitFailure> {
    for placement in batch {
        let updated = diesel::update(
            board_tasks::table.filter(board_tasks::id.eq(placement.task_id.into_inner())),
        )
        .set((
            board_tasks::status.eq(placement.status.as_str()),
            board_tasks::rank.eq(placement.rank.map(Rank::value)),
            board_tasks::updated_at.eq(diesel::dsl::now),
        ))
        .execute(connection)?;
        if updated == 0 {
            return Err(CommitFailure::Store(RankStoreError::NotFound(
                placement.task_id,
            )));
        }
    }

    // Collisions are checked after the whole batch so a renumber may pass
    // through transient duplicates.
    for placement in batch {
        let Some(rank) = placement.rank else { continue };
        let holder = board_tasks::table
            .filter(board_tasks::status.eq(placement.status.as_str()))
            .filter(board_tasks::rank.eq(rank.value()))
            .filter(board_tasks::id.ne(placement.task_id.into_inner()))
            .select(board_tasks::id)
            .first::<uuid::Uuid>(connection)
            .optional()?;
        if let Some(holder) = holder {
            return Err(CommitFailure::Store(RankStoreError::RankCollision {
                status: placement.status,
                rank,
                holder: TaskId::from_uuid(holder),
            }));
        }
    }
    Ok(())
}

fn to_new_row(task: &Task) -> RankStoreResult<NewBoardTaskRow> {
    let payload = serde_json::to_value(task.payload()).map_err(RankStoreError::persistence)?;
    Ok(NewBoardTaskRow {
        id: task.id().into_inner(),
        status: task.status().as_str().to_owned(),
        rank: task.rank().map(Rank::value),
        payload,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: BoardTaskRow) -> RankStoreResult<Task> {
    let BoardTaskRow {
        id,
        status: persisted_status,
        rank,
        payload: persisted_payload,
        created_at,
        updated_at,
    } = row;

    let task_id = TaskId::from_uuid(id);
    let status = TaskStatus::try_from(persisted_status.as_str()).map_err(|_| {
        BoardIntegrityError::UnknownStatus {
            task_id,
            status: persisted_status.clone(),
        }
    })?;
    let payload = serde_json::from_value::<TaskPayload>(persisted_payload)
        .map_err(RankStoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: task_id,
        status,
        rank: rank.map(Rank::new),
        payload,
        created_at,
        updated_at,
    }))
}
