//! Task aggregate and its opaque descriptive payload.

use super::{BoardDomainError, Rank, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive attributes carried with a task.
///
/// The ordering engine never inspects these fields; only the title is
/// validated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Task title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Optional free-form priority label.
    pub priority: Option<String>,
    /// Optional free-form effort estimate.
    pub estimate: Option<String>,
}

impl TaskPayload {
    /// Creates a payload with a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
            priority: None,
            estimate: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the estimate.
    #[must_use]
    pub fn with_estimate(mut self, estimate: impl Into<String>) -> Self {
        self.estimate = Some(estimate.into());
        self
    }
}

/// A unit of work ordered on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    rank: Option<Rank>,
    payload: TaskPayload,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted column.
    pub status: TaskStatus,
    /// Persisted rank, absent for backlog tasks.
    pub rank: Option<Rank>,
    /// Persisted descriptive payload.
    pub payload: TaskPayload,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest placement timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new unranked task in the backlog.
    ///
    /// This is the only way to create a task; tasks reach ranked columns
    /// exclusively through moves.
    #[must_use]
    pub fn new_in_backlog(payload: TaskPayload, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            status: TaskStatus::Backlog,
            rank: None,
            payload,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            status: data.status,
            rank: data.rank,
            payload: data.payload,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the column the task occupies.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the rank; tasks placed through moves have none in the
    /// backlog.
    #[must_use]
    pub const fn rank(&self) -> Option<Rank> {
        self.rank
    }

    /// Returns the descriptive payload.
    #[must_use]
    pub const fn payload(&self) -> &TaskPayload {
        &self.payload
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest placement timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Places the task in `status` at `rank`.
    ///
    /// Demotion to the backlog drops any rank.
    pub(crate) fn place(&mut self, status: TaskStatus, rank: Option<Rank>, clock: &impl Clock) {
        self.status = status;
        self.rank = if status.is_ranked() { rank } else { None };
        self.updated_at = clock.utc();
    }
}
