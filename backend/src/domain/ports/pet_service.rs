//! Driving ports for pets and their health history.

use async_trait::async_trait;

use crate::domain::{
    DeletionSummary, Error, MedicalRecord, MedicalRecordDraft, Pet, PetDraft, PetId, PetPatch,
    RecordId, User, VaccinationRecordDraft, VaccinationView,
};

/// Pet profile use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetService: Send + Sync {
    /// The caller's pets, newest first.
    async fn list_mine(&self, actor: &User) -> Result<Vec<Pet>, Error>;

    /// Register a pet for the caller.
    async fn create(&self, actor: &User, draft: PetDraft) -> Result<Pet, Error>;

    /// Fetch any pet.
    async fn get(&self, id: &PetId) -> Result<Pet, Error>;

    /// Update one of the caller's pets.
    async fn update(&self, actor: &User, id: &PetId, patch: PetPatch) -> Result<Pet, Error>;

    /// Delete a pet owned by the caller, or any pet for an admin.
    async fn delete(&self, actor: &User, id: &PetId) -> Result<DeletionSummary, Error>;
}

/// Medical and vaccination records, visible to the pet owner and admins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRecordService: Send + Sync {
    /// Medical history, newest visit first.
    async fn list_medical(&self, actor: &User, pet_id: &PetId)
    -> Result<Vec<MedicalRecord>, Error>;

    /// Add a medical record.
    async fn add_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        draft: MedicalRecordDraft,
    ) -> Result<MedicalRecord, Error>;

    /// Replace a medical record's fields.
    async fn update_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
        draft: MedicalRecordDraft,
    ) -> Result<MedicalRecord, Error>;

    /// Remove a medical record.
    async fn delete_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<(), Error>;

    /// Vaccinations, most recent first, flagged when overdue.
    async fn list_vaccinations(
        &self,
        actor: &User,
        pet_id: &PetId,
    ) -> Result<Vec<VaccinationView>, Error>;

    /// Add a vaccination record.
    async fn add_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        draft: VaccinationRecordDraft,
    ) -> Result<VaccinationView, Error>;

    /// Replace a vaccination record's fields.
    async fn update_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
        draft: VaccinationRecordDraft,
    ) -> Result<VaccinationView, Error>;

    /// Remove a vaccination record.
    async fn delete_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<(), Error>;
}
