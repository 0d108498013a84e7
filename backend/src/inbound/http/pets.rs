//! Pet profile handlers.
//!
//! ```text
//! GET /api/pet
//! POST /api/pet {"name":"Rex","species":"dog","birthDate":"2021-04-02"}
//! GET /api/pet/{id}
//! PUT /api/pet/{id} {"weightKg":null}
//! DELETE /api/pet/{id}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DeletionSummary, Error, Gender, Pet, PetDraft, PetId, PetInput, PetPatch, PetPatchInput,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, double_option, parse_optional_date, require};

const BIRTH_DATE: FieldName = FieldName::new("birthDate");

/// New pet body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    /// `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub image_url: Option<String>,
}

impl TryFrom<CreatePetRequest> for PetDraft {
    type Error = Error;

    fn try_from(value: CreatePetRequest) -> Result<Self, Self::Error> {
        let name = require(value.name, FieldName::new("name"))?;
        let species = require(value.species, FieldName::new("species"))?;
        let birth_date = parse_optional_date(value.birth_date.as_deref(), BIRTH_DATE)?;
        Ok(Self::try_new(PetInput {
            name: &name,
            species: &species,
            breed: value.breed.as_deref(),
            birth_date,
            gender: value.gender,
            weight_kg: value.weight_kg,
            image_url: value.image_url.as_deref(),
        })?)
    }
}

/// Partial pet update. `null` clears `birthDate` and `weightKg`; an empty
/// string clears `breed` and `imageUrl`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub birth_date: Option<Option<String>>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub weight_kg: Option<Option<f64>>,
    pub image_url: Option<String>,
}

impl TryFrom<UpdatePetRequest> for PetPatch {
    type Error = Error;

    fn try_from(value: UpdatePetRequest) -> Result<Self, Self::Error> {
        let birth_date = value
            .birth_date
            .map(|raw| parse_optional_date(raw.as_deref(), BIRTH_DATE))
            .transpose()?;
        Ok(Self::try_new(PetPatchInput {
            name: value.name.as_deref(),
            species: value.species.as_deref(),
            breed: value.breed.as_deref(),
            birth_date,
            gender: value.gender,
            weight_kg: value.weight_kg,
            image_url: value.image_url.as_deref(),
        })?)
    }
}

/// The caller's pets, newest first.
#[utoipa::path(
    get,
    path = "/api/pet",
    responses(
        (status = 200, description = "Pets", body = [Pet]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["pets"],
    operation_id = "listMyPets"
)]
pub async fn list_pets(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<Vec<Pet>>> {
    let pets = state.pets.list_mine(current.user()).await?;
    Ok(web::Json(pets))
}

/// Register a pet for the caller.
#[utoipa::path(
    post,
    path = "/api/pet",
    request_body = CreatePetRequest,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["pets"],
    operation_id = "createPet"
)]
pub async fn create_pet(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<CreatePetRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PetDraft::try_from(payload.into_inner())?;
    let pet = state.pets.create(current.user(), draft).await?;
    Ok(HttpResponse::Created().json(pet))
}

/// Fetch one pet.
#[utoipa::path(
    get,
    path = "/api/pet/{id}",
    params(("id" = PetId, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet", body = Pet),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["pets"],
    operation_id = "getPet",
    security([])
)]
pub async fn get_pet(
    state: web::Data<HttpState>,
    path: web::Path<PetId>,
) -> ApiResult<web::Json<Pet>> {
    let pet = state.pets.get(&path.into_inner()).await?;
    Ok(web::Json(pet))
}

/// Update a pet the caller owns.
#[utoipa::path(
    put,
    path = "/api/pet/{id}",
    params(("id" = PetId, Path, description = "Pet identifier")),
    request_body = UpdatePetRequest,
    responses(
        (status = 200, description = "Updated pet", body = Pet),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["pets"],
    operation_id = "updatePet"
)]
pub async fn update_pet(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
    payload: web::Json<UpdatePetRequest>,
) -> ApiResult<web::Json<Pet>> {
    let patch = PetPatch::try_from(payload.into_inner())?;
    let pet = state
        .pets
        .update(current.user(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(pet))
}

/// Delete a pet with its records and tasks; tagged posts lose the tag.
#[utoipa::path(
    delete,
    path = "/api/pet/{id}",
    params(("id" = PetId, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 403, description = "Neither owner nor admin", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["pets"],
    operation_id = "deletePet"
)]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state.pets.delete(current.user(), &path.into_inner()).await?;
    Ok(web::Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn create(body: serde_json::Value) -> Result<PetDraft, Error> {
        let request: CreatePetRequest = serde_json::from_value(body).expect("request shape");
        PetDraft::try_from(request)
    }

    fn update(body: serde_json::Value) -> Result<PetPatch, Error> {
        let request: UpdatePetRequest = serde_json::from_value(body).expect("request shape");
        PetPatch::try_from(request)
    }

    #[rstest]
    fn create_requires_name_and_species() {
        let err = create(json!({"name": "Rex"})).expect_err("species missing");
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("species"))
        );
    }

    #[rstest]
    fn create_defaults_gender_to_unknown() {
        let draft = create(json!({"name": "Rex", "species": "dog"})).expect("valid");
        assert_eq!(draft.gender, Gender::Unknown);
    }

    #[rstest]
    fn create_rejects_unparsable_birth_dates() {
        let err = create(json!({"name": "Rex", "species": "dog", "birthDate": "last spring"}))
            .expect_err("bad date");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_date"))
        );
    }

    #[rstest]
    #[case(json!({}), None)]
    #[case(json!({"weightKg": null}), Some(None))]
    #[case(json!({"weightKg": 12.5}), Some(Some(12.5)))]
    fn update_distinguishes_absent_and_null_weight(
        #[case] body: serde_json::Value,
        #[case] expected: Option<Option<f64>>,
    ) {
        assert_eq!(update(body).expect("valid").weight_kg, expected);
    }

    #[rstest]
    fn update_clears_birth_date_with_null() {
        let patch = update(json!({"birthDate": null})).expect("valid");
        assert_eq!(patch.birth_date, Some(None));
    }
}
