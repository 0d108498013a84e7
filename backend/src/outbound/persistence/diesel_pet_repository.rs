//! PostgreSQL-backed `PetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PetRepository, PetRepositoryError};
use crate::domain::{DeletionSummary, Pet, PetId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_cascades::delete_pets;
use super::models::PetRow;
use super::pool::{DbPool, PoolError};
use super::schema::pets;

/// Diesel-backed implementation of the pet repository port.
#[derive(Clone)]
pub struct DieselPetRepository {
    pool: DbPool,
}

impl DieselPetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PetRepositoryError {
    map_basic_pool_error(error, PetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PetRepositoryError {
    map_basic_diesel_error(
        error,
        PetRepositoryError::query,
        PetRepositoryError::connection,
    )
}

#[async_trait]
impl PetRepository for DieselPetRepository {
    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(pets::table)
            .values(&PetRow::from(pet))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = pets::table
            .find(id.as_uuid())
            .select(PetRow::as_select())
            .first::<PetRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Pet::from))
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetRow> = pets::table
            .filter(pets::owner_id.eq(owner_id.as_uuid()))
            .order((pets::created_at.desc(), pets::id.desc()))
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn update(&self, pet: &Pet) -> Result<bool, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(pets::table.find(pet.id.as_uuid()))
            .set(&PetRow::from(pet))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_cascade(
        &self,
        id: &PetId,
    ) -> Result<Option<DeletionSummary>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pet_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = pets::table
                    .find(pet_id)
                    .select(pets::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match exists {
                    Some(_) => delete_pets(conn, &[pet_id]).await.map(Some),
                    None => Ok(None),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
