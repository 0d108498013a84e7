//! Medical and vaccination history for pets.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::access::require_owner_or_admin;
use crate::domain::ports::{HealthRecordRepository, HealthRecordService, PetRepository};
use crate::domain::{
    Error, MedicalRecord, MedicalRecordDraft, Pet, PetId, RecordId, User, VaccinationRecord,
    VaccinationRecordDraft, VaccinationView,
};

/// Health record service implementing [`HealthRecordService`].
#[derive(Clone)]
pub struct HealthRecordServiceImpl<P, H> {
    pets: Arc<P>,
    records: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<P, H> HealthRecordServiceImpl<P, H> {
    /// Create a new service.
    pub fn new(pets: Arc<P>, records: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            pets,
            records,
            clock,
        }
    }
}

fn record_not_found() -> Error {
    Error::not_found("record not found")
}

impl<P, H> HealthRecordServiceImpl<P, H>
where
    P: PetRepository,
    H: HealthRecordRepository,
{
    async fn authorise(&self, actor: &User, pet_id: &PetId) -> Result<Pet, Error> {
        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .ok_or_else(|| Error::not_found("pet not found"))?;
        require_owner_or_admin(actor, &pet.owner_id, "pet")?;
        Ok(pet)
    }

    async fn medical_of(
        &self,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<MedicalRecord, Error> {
        self.records
            .find_medical(record_id)
            .await?
            .filter(|record| record.pet_id == *pet_id)
            .ok_or_else(record_not_found)
    }

    async fn vaccination_of(
        &self,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<VaccinationRecord, Error> {
        self.records
            .find_vaccination(record_id)
            .await?
            .filter(|record| record.pet_id == *pet_id)
            .ok_or_else(record_not_found)
    }

    fn view(&self, record: VaccinationRecord) -> VaccinationView {
        VaccinationView::new(record, self.clock.utc().date_naive())
    }
}

#[async_trait]
impl<P, H> HealthRecordService for HealthRecordServiceImpl<P, H>
where
    P: PetRepository,
    H: HealthRecordRepository,
{
    async fn list_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
    ) -> Result<Vec<MedicalRecord>, Error> {
        self.authorise(actor, pet_id).await?;
        Ok(self.records.list_medical(pet_id).await?)
    }

    async fn add_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        draft: MedicalRecordDraft,
    ) -> Result<MedicalRecord, Error> {
        self.authorise(actor, pet_id).await?;
        let record = draft.into_record(*pet_id, self.clock.utc());
        self.records.create_medical(&record).await?;
        Ok(record)
    }

    async fn update_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
        draft: MedicalRecordDraft,
    ) -> Result<MedicalRecord, Error> {
        self.authorise(actor, pet_id).await?;
        let mut record = self.medical_of(pet_id, record_id).await?;
        record.replace(draft);
        if !self.records.update_medical(&record).await? {
            return Err(record_not_found());
        }
        Ok(record)
    }

    async fn delete_medical(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<(), Error> {
        self.authorise(actor, pet_id).await?;
        self.medical_of(pet_id, record_id).await?;
        if !self.records.delete_medical(record_id).await? {
            return Err(record_not_found());
        }
        Ok(())
    }

    async fn list_vaccinations(
        &self,
        actor: &User,
        pet_id: &PetId,
    ) -> Result<Vec<VaccinationView>, Error> {
        self.authorise(actor, pet_id).await?;
        let records = self.records.list_vaccinations(pet_id).await?;
        Ok(records.into_iter().map(|record| self.view(record)).collect())
    }

    async fn add_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        draft: VaccinationRecordDraft,
    ) -> Result<VaccinationView, Error> {
        self.authorise(actor, pet_id).await?;
        let record = draft.into_record(*pet_id, self.clock.utc());
        self.records.create_vaccination(&record).await?;
        Ok(self.view(record))
    }

    async fn update_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
        draft: VaccinationRecordDraft,
    ) -> Result<VaccinationView, Error> {
        self.authorise(actor, pet_id).await?;
        let mut record = self.vaccination_of(pet_id, record_id).await?;
        record.replace(draft);
        if !self.records.update_vaccination(&record).await? {
            return Err(record_not_found());
        }
        Ok(self.view(record))
    }

    async fn delete_vaccination(
        &self,
        actor: &User,
        pet_id: &PetId,
        record_id: &RecordId,
    ) -> Result<(), Error> {
        self.authorise(actor, pet_id).await?;
        self.vaccination_of(pet_id, record_id).await?;
        if !self.records.delete_vaccination(record_id).await? {
            return Err(record_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockHealthRecordRepository, MockPetRepository};
    use crate::domain::test_fixtures::{fixture_clock, fixture_today, pet_of, user};
    use crate::domain::{ErrorCode, VaccinationInput};
    use chrono::Days;
    use rstest::rstest;

    fn pets_returning(pet: Pet) -> MockPetRepository {
        let mut pets = MockPetRepository::new();
        pets.expect_find_by_id()
            .returning(move |_| Ok(Some(pet.clone())));
        pets
    }

    #[rstest]
    #[tokio::test]
    async fn strangers_cannot_read_medical_history() {
        let owner = user("owner");
        let pet = pet_of(&owner);
        let pet_id = pet.id;
        let mut records = MockHealthRecordRepository::new();
        records.expect_list_medical().times(0);

        let service = HealthRecordServiceImpl::new(
            Arc::new(pets_returning(pet)),
            Arc::new(records),
            fixture_clock(),
        );
        let error = service
            .list_medical(&user("stranger"), &pet_id)
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn record_of_another_pet_is_not_found() {
        let owner = user("owner");
        let pet = pet_of(&owner);
        let pet_id = pet.id;
        let other_record =
            MedicalRecordDraft::try_from_parts("Checkup", None, None, fixture_today())
                .expect("draft")
                .into_record(PetId::random(), chrono::Utc::now());
        let record_id = other_record.id;
        let mut records = MockHealthRecordRepository::new();
        records
            .expect_find_medical()
            .return_once(move |_| Ok(Some(other_record)));
        records.expect_delete_medical().times(0);

        let service = HealthRecordServiceImpl::new(
            Arc::new(pets_returning(pet)),
            Arc::new(records),
            fixture_clock(),
        );
        let error = service
            .delete_medical(&owner, &pet_id, &record_id)
            .await
            .expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(1, false)]
    #[case(0, false)]
    #[tokio::test]
    async fn vaccinations_report_overdue_against_clock(
        #[case] days_until_due: u64,
        #[case] overdue: bool,
    ) {
        let owner = user("owner");
        let pet = pet_of(&owner);
        let pet_id = pet.id;
        let due = fixture_today()
            .checked_add_days(Days::new(days_until_due))
            .expect("valid date");
        let administered = fixture_today()
            .checked_sub_days(Days::new(365))
            .expect("valid date");
        let record = VaccinationRecordDraft::try_new(VaccinationInput {
            vaccine_name: "Rabies",
            administered_on: administered,
            next_due_on: Some(due),
            vet_name: None,
            notes: None,
        })
        .expect("draft")
        .into_record(pet_id, chrono::Utc::now());
        let mut records = MockHealthRecordRepository::new();
        records
            .expect_list_vaccinations()
            .return_once(move |_| Ok(vec![record]));

        let service = HealthRecordServiceImpl::new(
            Arc::new(pets_returning(pet)),
            Arc::new(records),
            fixture_clock(),
        );
        let views = service
            .list_vaccinations(&owner, &pet_id)
            .await
            .expect("views");

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].is_overdue, overdue);
    }

    #[rstest]
    #[tokio::test]
    async fn past_due_vaccination_is_overdue() {
        let owner = user("owner");
        let pet = pet_of(&owner);
        let pet_id = pet.id;
        let administered = fixture_today()
            .checked_sub_days(Days::new(400))
            .expect("valid date");
        let due = fixture_today()
            .checked_sub_days(Days::new(1))
            .expect("valid date");
        let draft = VaccinationRecordDraft::try_new(VaccinationInput {
            vaccine_name: "Distemper",
            administered_on: administered,
            next_due_on: Some(due),
            vet_name: None,
            notes: None,
        })
        .expect("draft");
        let mut records = MockHealthRecordRepository::new();
        records
            .expect_create_vaccination()
            .times(1)
            .return_once(|_| Ok(()));

        let service = HealthRecordServiceImpl::new(
            Arc::new(pets_returning(pet)),
            Arc::new(records),
            fixture_clock(),
        );
        let view = service
            .add_vaccination(&owner, &pet_id, draft)
            .await
            .expect("created");

        assert!(view.is_overdue);
    }
}
