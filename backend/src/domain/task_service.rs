//! Care task service. Tasks are private to their owner.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{PetRepository, TaskRepository, TaskService};
use crate::domain::{
    Error, FieldError, PetId, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, User,
};

/// Task service implementing [`TaskService`].
#[derive(Clone)]
pub struct TaskServiceImpl<T, P> {
    tasks: Arc<T>,
    pets: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<T, P> TaskServiceImpl<T, P> {
    /// Create a new service.
    pub fn new(tasks: Arc<T>, pets: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { tasks, pets, clock }
    }
}

fn task_not_found() -> Error {
    Error::not_found("task not found")
}

impl<T, P> TaskServiceImpl<T, P>
where
    T: TaskRepository,
    P: PetRepository,
{
    /// Another user's task is reported as missing.
    async fn find_owned(&self, actor: &User, id: &TaskId) -> Result<Task, Error> {
        self.tasks
            .find_by_id(id)
            .await?
            .filter(|task| task.owner_id == actor.id)
            .ok_or_else(task_not_found)
    }

    async fn ensure_pet_owned(&self, actor: &User, pet_id: Option<PetId>) -> Result<(), Error> {
        let Some(pet_id) = pet_id else {
            return Ok(());
        };
        let owned = self
            .pets
            .find_by_id(&pet_id)
            .await?
            .is_some_and(|pet| pet.owner_id == actor.id);
        if owned {
            Ok(())
        } else {
            Err(FieldError::new("petId", "invalid_pet", "pet must be one of your pets").into())
        }
    }
}

#[async_trait]
impl<T, P> TaskService for TaskServiceImpl<T, P>
where
    T: TaskRepository,
    P: PetRepository,
{
    async fn list(&self, actor: &User, filter: TaskFilter) -> Result<Vec<Task>, Error> {
        Ok(self.tasks.list(&actor.id, filter).await?)
    }

    async fn create(&self, actor: &User, draft: TaskDraft) -> Result<Task, Error> {
        self.ensure_pet_owned(actor, draft.pet_id).await?;
        let task = draft.into_task(actor.id, self.clock.utc());
        self.tasks.create(&task).await?;
        Ok(task)
    }

    async fn update(&self, actor: &User, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let mut task = self.find_owned(actor, id).await?;
        if let Some(pet_id) = patch.pet_id {
            self.ensure_pet_owned(actor, pet_id).await?;
        }
        task.apply(patch, self.clock.utc());
        if !self.tasks.update(&task).await? {
            return Err(task_not_found());
        }
        Ok(task)
    }

    async fn delete(&self, actor: &User, id: &TaskId) -> Result<(), Error> {
        self.find_owned(actor, id).await?;
        if !self.tasks.delete(id).await? {
            return Err(task_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPetRepository, MockTaskRepository};
    use crate::domain::test_fixtures::{admin, fixture_clock, fixture_timestamp, pet_of, user};
    use crate::domain::{ErrorCode, TaskPatchInput};
    use rstest::rstest;

    fn task_of(owner: &User) -> Task {
        TaskDraft::try_from_parts("Walk", None, None, None)
            .expect("draft")
            .into_task(owner.id, fixture_timestamp())
    }

    #[rstest]
    #[case::stranger(user("stranger"))]
    #[case::admin(admin("moderator"))]
    #[tokio::test]
    async fn other_users_tasks_are_invisible(#[case] actor: User) {
        let task = task_of(&user("owner"));
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().return_once(move |_| Ok(Some(task)));
        tasks.expect_delete().times(0);

        let error = TaskServiceImpl::new(
            Arc::new(tasks),
            Arc::new(MockPetRepository::new()),
            fixture_clock(),
        )
        .delete(&actor, &TaskId::random())
        .await
        .expect_err("hidden");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn completing_a_task_persists_the_flag() {
        let owner = user("owner");
        let task = task_of(&owner);
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().return_once(move |_| Ok(Some(task)));
        tasks
            .expect_update()
            .withf(|task| task.completed)
            .times(1)
            .return_once(|_| Ok(true));
        let patch = TaskPatch::try_new(TaskPatchInput {
            completed: Some(true),
            ..TaskPatchInput::default()
        })
        .expect("patch");

        let updated = TaskServiceImpl::new(
            Arc::new(tasks),
            Arc::new(MockPetRepository::new()),
            fixture_clock(),
        )
        .update(&owner, &TaskId::random(), patch)
        .await
        .expect("updated");

        assert!(updated.completed);
    }

    #[rstest]
    #[tokio::test]
    async fn task_for_foreign_pet_is_rejected() {
        let owner = user("owner");
        let pet = pet_of(&user("neighbour"));
        let pet_id = pet.id;
        let mut pets = MockPetRepository::new();
        pets.expect_find_by_id().return_once(move |_| Ok(Some(pet)));
        let mut tasks = MockTaskRepository::new();
        tasks.expect_create().times(0);
        let draft = TaskDraft::try_from_parts("Vet visit", None, None, Some(pet_id))
            .expect("draft");

        let error = TaskServiceImpl::new(Arc::new(tasks), Arc::new(pets), fixture_clock())
            .create(&owner, draft)
            .await
            .expect_err("invalid pet");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
