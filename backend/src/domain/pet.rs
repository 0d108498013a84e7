//! Pet profiles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, optional_text, optional_url, required_text};
use super::{PetId, UserId};

const NAME_MAX: usize = 50;
const SPECIES_MAX: usize = 30;
const BREED_MAX: usize = 50;
const WEIGHT_MAX_KG: f64 = 500.0;

/// Recorded sex of a pet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the storage spelling; unknown values map to [`Gender::Unknown`].
    #[must_use]
    pub fn from_storage(value: &str) -> Self {
        match value {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// A pet belonging to one user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub owner_id: UserId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub weight_kg: Option<f64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw pet fields as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct PetInput<'a> {
    pub name: &'a str,
    pub species: &'a str,
    pub breed: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub image_url: Option<&'a str>,
}

/// Validated fields for a new pet.
#[derive(Debug, Clone, PartialEq)]
pub struct PetDraft {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub weight_kg: Option<f64>,
    pub image_url: Option<String>,
}

impl PetDraft {
    /// Validate raw input. Birth dates are checked against the clock by
    /// [`PetDraft::ensure_born_by`].
    pub fn try_new(input: PetInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: required_text("name", input.name, NAME_MAX)?,
            species: required_text("species", input.species, SPECIES_MAX)?,
            breed: optional_text("breed", input.breed, BREED_MAX)?,
            birth_date: input.birth_date,
            gender: input.gender.unwrap_or_default(),
            weight_kg: input.weight_kg.map(check_weight).transpose()?,
            image_url: optional_url("imageUrl", input.image_url)?,
        })
    }

    /// Reject birth dates after `today`.
    pub fn ensure_born_by(&self, today: NaiveDate) -> Result<(), FieldError> {
        self.birth_date
            .map_or(Ok(()), |date| check_birth_date(date, today))
    }

    /// Materialise the pet for `owner`.
    #[must_use]
    pub fn into_pet(self, owner_id: UserId, at: DateTime<Utc>) -> Pet {
        Pet {
            id: PetId::random(),
            owner_id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            birth_date: self.birth_date,
            gender: self.gender,
            weight_kg: self.weight_kg,
            image_url: self.image_url,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Validated partial update. Outer `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<Option<f64>>,
    pub image_url: Option<Option<String>>,
}

/// Raw partial update as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct PetPatchInput<'a> {
    pub name: Option<&'a str>,
    pub species: Option<&'a str>,
    pub breed: Option<&'a str>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<Option<f64>>,
    pub image_url: Option<&'a str>,
}

impl PetPatch {
    /// Validate a raw patch. Empty strings clear optional text.
    pub fn try_new(input: PetPatchInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: input
                .name
                .map(|value| required_text("name", value, NAME_MAX))
                .transpose()?,
            species: input
                .species
                .map(|value| required_text("species", value, SPECIES_MAX))
                .transpose()?,
            breed: input
                .breed
                .map(|value| optional_text("breed", Some(value), BREED_MAX))
                .transpose()?,
            birth_date: input.birth_date,
            gender: input.gender,
            weight_kg: input
                .weight_kg
                .map(|weight| weight.map(check_weight).transpose())
                .transpose()?,
            image_url: input
                .image_url
                .map(|value| optional_url("imageUrl", Some(value)))
                .transpose()?,
        })
    }

    /// Reject a new birth date after `today`.
    pub fn ensure_born_by(&self, today: NaiveDate) -> Result<(), FieldError> {
        match self.birth_date {
            Some(Some(date)) => check_birth_date(date, today),
            _ => Ok(()),
        }
    }
}

impl Pet {
    /// Apply a validated patch.
    pub fn apply(&mut self, patch: PetPatch, at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(species) = patch.species {
            self.species = species;
        }
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(weight_kg) = patch.weight_kg {
            self.weight_kg = weight_kg;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.updated_at = at;
    }
}

fn check_birth_date(date: NaiveDate, today: NaiveDate) -> Result<(), FieldError> {
    if date > today {
        return Err(FieldError::new(
            "birthDate",
            "in_future",
            "birthDate must not be in the future",
        ));
    }
    Ok(())
}

fn check_weight(weight: f64) -> Result<f64, FieldError> {
    if weight.is_finite() && weight > 0.0 && weight <= WEIGHT_MAX_KG {
        Ok(weight)
    } else {
        Err(FieldError::new(
            "weightKg",
            "out_of_range",
            format!("weightKg must be greater than 0 and at most {WEIGHT_MAX_KG}"),
        ))
    }
}
