//! Intake of newly generated tasks into the backlog.

use crate::board::{
    domain::{BoardDomainError, Task, TaskPayload},
    ports::{RankStore, RankStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a backlog task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    estimate: Option<String>,
}

impl NewTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            estimate: None,
        }
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

/// Service-level errors for task intake.
#[derive(Debug, Error)]
pub enum TaskIntakeError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] RankStoreError),
}

/// Result type for task intake operations.
pub type TaskIntakeResult<T> = Result<T, TaskIntakeError>;

/// Creates backlog tasks on behalf of the task-generation producer.
#[derive(Clone)]
pub struct TaskIntakeService<S, C>
where
    S: RankStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskIntakeService<S, C>
where
    S: RankStore,
    C: Clock + Send + Sync,
{
    /// Creates a new intake service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates an unranked backlog task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIntakeError`] when the title is blank or the store
    /// rejects the task.
    pub async fn create(&self, request: NewTaskRequest) -> TaskIntakeResult<Task> {
        let mut payload = TaskPayload::new(request.title)?;
        if let Some(description) = request.description {
            payload = payload.with_description(description);
        }
        if let Some(priority) = request.priority {
            payload = payload.with_priority(priority);
        }
        if let Some(estimate) = request.estimate {
            payload = payload.with_estimate(estimate);
        }

        let task = Task::new_in_backlog(payload, &*self.clock);
        self.store.store(&task).await?;
        tracing::debug!(task_id = %task.id(), "task added to backlog");
        Ok(task)
    }

    /// Creates several backlog tasks in order.
    ///
    /// Stops at the first failure; tasks created before it are kept.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaskIntakeError`] encountered.
    pub async fn create_all(
        &self,
        requests: Vec<NewTaskRequest>,
    ) -> TaskIntakeResult<Vec<Task>> {
        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            created.push(self.create(request).await?);
        }
        Ok(created)
    }

    /// Returns every task on the board in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIntakeError::Store`] when the store cannot be read.
    pub async fn list(&self) -> TaskIntakeResult<Vec<Task>> {
        Ok(self.store.load_all().await?)
    }
}
