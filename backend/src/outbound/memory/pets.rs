//! Pet and health record ports over the in-memory state.

use std::cmp::Reverse;
use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::ports::{
    HealthRecordRepository, HealthRecordRepositoryError, PetRepository, PetRepositoryError,
};
use crate::domain::{
    DeletionSummary, MedicalRecord, Pet, PetId, RecordId, UserId, VaccinationRecord,
};

use super::{MemoryStore, Parent};

#[async_trait]
impl PetRepository for MemoryStore {
    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::User(pet.owner_id)])
            .map_err(PetRepositoryError::query)?;
        state.pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetRepositoryError> {
        Ok(self.state().pets.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut pets: Vec<Pet> = self
            .state()
            .pets
            .values()
            .filter(|pet| pet.owner_id == *owner_id)
            .cloned()
            .collect();
        pets.sort_by_key(|pet| Reverse((pet.created_at, pet.id)));
        Ok(pets)
    }

    async fn update(&self, pet: &Pet) -> Result<bool, PetRepositoryError> {
        let mut state = self.state();
        Ok(match state.pets.get_mut(&pet.id) {
            Some(stored) => {
                *stored = pet.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_cascade(
        &self,
        id: &PetId,
    ) -> Result<Option<DeletionSummary>, PetRepositoryError> {
        let mut state = self.state();
        if !state.pets.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(state.delete_pets(&HashSet::from([*id]))))
    }
}

#[async_trait]
impl HealthRecordRepository for MemoryStore {
    async fn create_medical(
        &self,
        record: &MedicalRecord,
    ) -> Result<(), HealthRecordRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Pet(record.pet_id)])
            .map_err(HealthRecordRepositoryError::query)?;
        state.medical.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_medical(
        &self,
        id: &RecordId,
    ) -> Result<Option<MedicalRecord>, HealthRecordRepositoryError> {
        Ok(self.state().medical.get(id).cloned())
    }

    async fn list_medical(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<MedicalRecord>, HealthRecordRepositoryError> {
        let mut records: Vec<MedicalRecord> = self
            .state()
            .medical
            .values()
            .filter(|record| record.pet_id == *pet_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| Reverse((record.visit_date, record.created_at)));
        Ok(records)
    }

    async fn update_medical(
        &self,
        record: &MedicalRecord,
    ) -> Result<bool, HealthRecordRepositoryError> {
        let mut state = self.state();
        Ok(match state.medical.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_medical(&self, id: &RecordId) -> Result<bool, HealthRecordRepositoryError> {
        Ok(self.state().medical.remove(id).is_some())
    }

    async fn create_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<(), HealthRecordRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Pet(record.pet_id)])
            .map_err(HealthRecordRepositoryError::query)?;
        state.vaccinations.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_vaccination(
        &self,
        id: &RecordId,
    ) -> Result<Option<VaccinationRecord>, HealthRecordRepositoryError> {
        Ok(self.state().vaccinations.get(id).cloned())
    }

    async fn list_vaccinations(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<VaccinationRecord>, HealthRecordRepositoryError> {
        let mut records: Vec<VaccinationRecord> = self
            .state()
            .vaccinations
            .values()
            .filter(|record| record.pet_id == *pet_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| Reverse((record.administered_on, record.created_at)));
        Ok(records)
    }

    async fn update_vaccination(
        &self,
        record: &VaccinationRecord,
    ) -> Result<bool, HealthRecordRepositoryError> {
        let mut state = self.state();
        Ok(match state.vaccinations.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_vaccination(
        &self,
        id: &RecordId,
    ) -> Result<bool, HealthRecordRepositoryError> {
        Ok(self.state().vaccinations.remove(id).is_some())
    }
}
