//! `TaskRepository` over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskFilter, TaskId, UserId, task_order};

use super::{MemoryStore, Parent};

fn task_parents(task: &Task) -> Vec<Parent> {
    std::iter::once(Parent::User(task.owner_id))
        .chain(task.pet_id.map(Parent::Pet))
        .collect()
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&task_parents(task))
            .map_err(TaskRepositoryError::query)?;
        state.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.state().tasks.get(id).cloned())
    }

    async fn list(
        &self,
        owner_id: &UserId,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut tasks: Vec<Task> = self
            .state()
            .tasks
            .values()
            .filter(|task| task.owner_id == *owner_id && filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(task_order);
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError> {
        let mut state = self.state();
        if !state.tasks.contains_key(&task.id) {
            return Ok(false);
        }
        state
            .require_parents(&task_parents(task))
            .map_err(TaskRepositoryError::query)?;
        state.tasks.insert(task.id, task.clone());
        Ok(true)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError> {
        Ok(self.state().tasks.remove(id).is_some())
    }
}
