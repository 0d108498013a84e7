//! Driving port for care tasks.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, User};

/// Private to-do list per user. Other users' tasks are reported as missing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// The caller's tasks, incomplete first.
    async fn list(&self, actor: &User, filter: TaskFilter) -> Result<Vec<Task>, Error>;

    /// Add a task.
    async fn create(&self, actor: &User, draft: TaskDraft) -> Result<Task, Error>;

    /// Edit a task.
    async fn update(&self, actor: &User, id: &TaskId, patch: TaskPatch) -> Result<Task, Error>;

    /// Delete a task.
    async fn delete(&self, actor: &User, id: &TaskId) -> Result<(), Error>;
}
