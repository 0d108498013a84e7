//! Port for medical and vaccination record persistence.

use async_trait::async_trait;

use crate::domain::{MedicalRecord, PetId, RecordId, VaccinationRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by health record repository adapters.
    pub enum HealthRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "health record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "health record repository query failed: {message}",
    }
}

/// Port for reading and writing a pet's health history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRecordRepository: Send + Sync {
    /// Insert a medical record.
    async fn create_medical(&self, record: &MedicalRecord)
    -> Result<(), HealthRecordRepositoryError>;

    /// Find a medical record by id.
    async fn find_medical(
        &self,
        id: &RecordId,
    ) -> Result<Option<MedicalRecord>, HealthRecordRepositoryError>;

    /// List a pet's medical records, most recent visit first.
    async fn list_medical(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<MedicalRecord>, HealthRecordRepositoryError>;

    /// Overwrite a medical record. Returns `false` when it is gone.
    async fn update_medical(
        &self,
        record: &MedicalRecord,
    ) -> Result<bool, HealthRecordRepositoryError>;

    /// Delete a medical record. Returns `false` when it is gone.
    async fn delete_medical(&self, id: &RecordId) -> Result<bool, HealthRecordRepositoryError>;

    /// Insert a vaccination record.
    async fn create_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<(), HealthRecordRepositoryError>;

    /// Find a vaccination record by id.
    async fn find_vaccination(
        &self,
        id: &RecordId,
    ) -> Result<Option<VaccinationRecord>, HealthRecordRepositoryError>;

    /// List a pet's vaccinations, most recently administered first.
    async fn list_vaccinations(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<VaccinationRecord>, HealthRecordRepositoryError>;

    /// Overwrite a vaccination record. Returns `false` when it is gone.
    async fn update_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<bool, HealthRecordRepositoryError>;

    /// Delete a vaccination record. Returns `false` when it is gone.
    async fn delete_vaccination(&self, id: &RecordId)
    -> Result<bool, HealthRecordRepositoryError>;
}
