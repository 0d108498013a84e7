//! Medical and vaccination history kept per pet.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::validation::{FieldError, optional_text, required_text};
use super::{PetId, RecordId};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 2000;
const VET_NAME_MAX: usize = 100;
const NOTES_MAX: usize = 1000;

/// A vet visit or other medical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: RecordId,
    pub pet_id: PetId,
    pub title: String,
    pub description: Option<String>,
    pub vet_name: Option<String>,
    pub visit_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Validated medical record fields, used for both create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalRecordDraft {
    pub title: String,
    pub description: Option<String>,
    pub vet_name: Option<String>,
    pub visit_date: NaiveDate,
}

impl MedicalRecordDraft {
    /// Validate raw fields.
    pub fn try_from_parts(
        title: &str,
        description: Option<&str>,
        vet_name: Option<&str>,
        visit_date: NaiveDate,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            title: required_text("title", title, TITLE_MAX)?,
            description: optional_text("description", description, DESCRIPTION_MAX)?,
            vet_name: optional_text("vetName", vet_name, VET_NAME_MAX)?,
            visit_date,
        })
    }

    /// Materialise a new record for `pet_id`.
    #[must_use]
    pub fn into_record(self, pet_id: PetId, at: DateTime<Utc>) -> MedicalRecord {
        MedicalRecord {
            id: RecordId::random(),
            pet_id,
            title: self.title,
            description: self.description,
            vet_name: self.vet_name,
            visit_date: self.visit_date,
            created_at: at,
        }
    }
}

impl MedicalRecord {
    /// Replace the editable fields.
    pub fn replace(&mut self, draft: MedicalRecordDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.vet_name = draft.vet_name;
        self.visit_date = draft.visit_date;
    }
}

/// An administered vaccine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub id: RecordId,
    pub pet_id: PetId,
    pub vaccine_name: String,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VaccinationRecord {
    /// Whether the booster date has passed as of `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_due_on.is_some_and(|due| due < today)
    }

    /// Replace the editable fields.
    pub fn replace(&mut self, draft: VaccinationRecordDraft) {
        self.vaccine_name = draft.vaccine_name;
        self.administered_on = draft.administered_on;
        self.next_due_on = draft.next_due_on;
        self.vet_name = draft.vet_name;
        self.notes = draft.notes;
    }
}

/// Vaccination record plus its overdue flag as of the request date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationView {
    #[serde(flatten)]
    pub record: VaccinationRecord,
    pub is_overdue: bool,
}

impl VaccinationView {
    /// Project `record` as of `today`.
    #[must_use]
    pub fn new(record: VaccinationRecord, today: NaiveDate) -> Self {
        let is_overdue = record.is_overdue(today);
        Self { record, is_overdue }
    }
}

/// Validated vaccination fields, used for both create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationRecordDraft {
    pub vaccine_name: String,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
}

/// Raw vaccination fields as submitted by a client.
#[derive(Debug, Clone)]
pub struct VaccinationInput<'a> {
    pub vaccine_name: &'a str,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub vet_name: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl VaccinationRecordDraft {
    /// Validate raw fields; the next due date may not precede administration.
    pub fn try_new(input: VaccinationInput<'_>) -> Result<Self, FieldError> {
        if input
            .next_due_on
            .is_some_and(|due| due < input.administered_on)
        {
            return Err(FieldError::new(
                "nextDueOn",
                "before_administered",
                "nextDueOn must not be before administeredOn",
            ));
        }
        Ok(Self {
            vaccine_name: required_text("vaccineName", input.vaccine_name, TITLE_MAX)?,
            administered_on: input.administered_on,
            next_due_on: input.next_due_on,
            vet_name: optional_text("vetName", input.vet_name, VET_NAME_MAX)?,
            notes: optional_text("notes", input.notes, NOTES_MAX)?,
        })
    }

    /// Materialise a new record for `pet_id`.
    #[must_use]
    pub fn into_record(self, pet_id: PetId, at: DateTime<Utc>) -> VaccinationRecord {
        VaccinationRecord {
            id: RecordId::random(),
            pet_id,
            vaccine_name: self.vaccine_name,
            administered_on: self.administered_on,
            next_due_on: self.next_due_on,
            vet_name: self.vet_name,
            notes: self.notes,
            created_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn input(next_due_on: Option<NaiveDate>) -> VaccinationInput<'static> {
        VaccinationInput {
            vaccine_name: "Rabies",
            administered_on: date(2025, 3, 1),
            next_due_on,
            vet_name: None,
            notes: Some("  "),
        }
    }

    #[rstest]
    fn next_due_before_administered_is_rejected() {
        let err = VaccinationRecordDraft::try_new(input(Some(date(2025, 2, 1))))
            .expect_err("due date precedes administration");
        assert_eq!(err.field(), "nextDueOn");
    }

    #[rstest]
    fn blank_notes_are_dropped() {
        let draft = VaccinationRecordDraft::try_new(input(None)).expect("valid draft");
        assert_eq!(draft.notes, None);
    }

    #[rstest]
    #[case(Some(date(2026, 3, 1)), date(2026, 3, 2), true)]
    #[case(Some(date(2026, 3, 1)), date(2026, 3, 1), false)]
    #[case(None, date(2030, 1, 1), false)]
    fn overdue_flag(
        #[case] next_due_on: Option<NaiveDate>,
        #[case] today: NaiveDate,
        #[case] expected: bool,
    ) {
        let record = VaccinationRecordDraft::try_new(input(next_due_on))
            .expect("valid draft")
            .into_record(PetId::random(), Utc::now());
        assert_eq!(VaccinationView::new(record, today).is_overdue, expected);
    }

    #[rstest]
    fn medical_title_is_required() {
        let err = MedicalRecordDraft::try_from_parts(" ", None, None, date(2025, 1, 1))
            .expect_err("blank title");
        assert_eq!(err.code(), "required");
    }
}
