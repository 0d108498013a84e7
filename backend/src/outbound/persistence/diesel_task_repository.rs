//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskFilter, TaskId, UserId, task_order};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TaskRow;
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

/// Diesel-backed implementation of the task repository port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskRepositoryError {
    map_basic_pool_error(error, TaskRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    map_basic_diesel_error(
        error,
        TaskRepositoryError::query,
        TaskRepositoryError::connection,
    )
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn create(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tasks::table)
            .values(&TaskRow::from(task))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tasks::table
            .find(id.as_uuid())
            .select(TaskRow::as_select())
            .first::<TaskRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Task::from))
    }

    async fn list(
        &self,
        owner_id: &UserId,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = tasks::table
            .filter(tasks::owner_id.eq(*owner_id.as_uuid()))
            .select(TaskRow::as_select())
            .into_boxed();
        if let Some(completed) = filter.completed {
            select = select.filter(tasks::completed.eq(completed));
        }
        if let Some(pet_id) = filter.pet_id {
            select = select.filter(tasks::pet_id.eq(*pet_id.as_uuid()));
        }
        let rows: Vec<TaskRow> = select.load(&mut conn).await.map_err(map_diesel_error)?;

        let mut found: Vec<Task> = rows.into_iter().map(Task::from).collect();
        found.sort_by(task_order);
        Ok(found)
    }

    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(tasks::table.find(task.id.as_uuid()))
            .set(&TaskRow::from(task))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tasks::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
