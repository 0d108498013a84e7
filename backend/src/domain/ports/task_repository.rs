//! Port for care task persistence.

use async_trait::async_trait;

use crate::domain::{Task, TaskFilter, TaskId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Port for reading and writing tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task.
    async fn create(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Find a task by id.
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// List an owner's tasks in [`crate::domain::task_order`].
    async fn list(
        &self,
        owner_id: &UserId,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Overwrite a task. Returns `false` when it is gone.
    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError>;

    /// Delete a task. Returns `false` when it is gone.
    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError>;
}
