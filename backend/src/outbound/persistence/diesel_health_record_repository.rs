//! PostgreSQL-backed `HealthRecordRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HealthRecordRepository, HealthRecordRepositoryError};
use crate::domain::{MedicalRecord, PetId, RecordId, VaccinationRecord};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MedicalRecordRow, VaccinationRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::{medical_records, vaccination_records};

/// Diesel-backed implementation of the health record repository port.
#[derive(Clone)]
pub struct DieselHealthRecordRepository {
    pool: DbPool,
}

impl DieselHealthRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HealthRecordRepositoryError {
    map_basic_pool_error(error, HealthRecordRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HealthRecordRepositoryError {
    map_basic_diesel_error(
        error,
        HealthRecordRepositoryError::query,
        HealthRecordRepositoryError::connection,
    )
}

#[async_trait]
impl HealthRecordRepository for DieselHealthRecordRepository {
    async fn create_medical(
        &self,
        record: &MedicalRecord,
    ) -> Result<(), HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(medical_records::table)
            .values(&MedicalRecordRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_medical(
        &self,
        id: &RecordId,
    ) -> Result<Option<MedicalRecord>, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = medical_records::table
            .find(id.as_uuid())
            .select(MedicalRecordRow::as_select())
            .first::<MedicalRecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(MedicalRecord::from))
    }

    async fn list_medical(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<MedicalRecord>, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MedicalRecordRow> = medical_records::table
            .filter(medical_records::pet_id.eq(pet_id.as_uuid()))
            .order((
                medical_records::visit_date.desc(),
                medical_records::created_at.desc(),
            ))
            .select(MedicalRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(MedicalRecord::from).collect())
    }

    async fn update_medical(
        &self,
        record: &MedicalRecord,
    ) -> Result<bool, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(medical_records::table.find(record.id.as_uuid()))
            .set(&MedicalRecordRow::from(record))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_medical(&self, id: &RecordId) -> Result<bool, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(medical_records::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn create_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<(), HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(vaccination_records::table)
            .values(&VaccinationRecordRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_vaccination(
        &self,
        id: &RecordId,
    ) -> Result<Option<VaccinationRecord>, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = vaccination_records::table
            .find(id.as_uuid())
            .select(VaccinationRecordRow::as_select())
            .first::<VaccinationRecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(VaccinationRecord::from))
    }

    async fn list_vaccinations(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<VaccinationRecord>, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<VaccinationRecordRow> = vaccination_records::table
            .filter(vaccination_records::pet_id.eq(pet_id.as_uuid()))
            .order((
                vaccination_records::administered_on.desc(),
                vaccination_records::created_at.desc(),
            ))
            .select(VaccinationRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(VaccinationRecord::from).collect())
    }

    async fn update_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<bool, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(vaccination_records::table.find(record.id.as_uuid()))
            .set(&VaccinationRecordRow::from(record))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_vaccination(
        &self,
        id: &RecordId,
    ) -> Result<bool, HealthRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(vaccination_records::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
