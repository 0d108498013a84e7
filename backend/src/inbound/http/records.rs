//! Medical and vaccination record handlers, nested under a pet.
//!
//! ```text
//! GET|POST /api/pet/{id}/medical
//! PUT|DELETE /api/pet/{id}/medical/{recordId}
//! GET|POST /api/pet/{id}/vaccination
//! PUT|DELETE /api/pet/{id}/vaccination/{recordId}
//! ```
//!
//! `PUT` replaces every field of a record, so both verbs share one body.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, MedicalRecord, MedicalRecordDraft, PetId, RecordId, VaccinationInput,
    VaccinationRecordDraft, VaccinationView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_date, parse_optional_date, require};

/// Medical visit body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub vet_name: Option<String>,
    /// `YYYY-MM-DD`.
    pub visit_date: Option<String>,
}

impl TryFrom<MedicalRecordRequest> for MedicalRecordDraft {
    type Error = Error;

    fn try_from(value: MedicalRecordRequest) -> Result<Self, Self::Error> {
        let field = FieldName::new("visitDate");
        let title = require(value.title, FieldName::new("title"))?;
        let visit_date = parse_date(&require(value.visit_date, field)?, field)?;
        Ok(Self::try_from_parts(
            &title,
            value.description.as_deref(),
            value.vet_name.as_deref(),
            visit_date,
        )?)
    }
}

/// Vaccination body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRequest {
    pub vaccine_name: Option<String>,
    /// `YYYY-MM-DD`.
    pub administered_on: Option<String>,
    /// `YYYY-MM-DD`; drives the overdue flag.
    pub next_due_on: Option<String>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<VaccinationRequest> for VaccinationRecordDraft {
    type Error = Error;

    fn try_from(value: VaccinationRequest) -> Result<Self, Self::Error> {
        let administered = FieldName::new("administeredOn");
        let vaccine_name = require(value.vaccine_name, FieldName::new("vaccineName"))?;
        let administered_on =
            parse_date(&require(value.administered_on, administered)?, administered)?;
        let next_due_on =
            parse_optional_date(value.next_due_on.as_deref(), FieldName::new("nextDueOn"))?;
        Ok(Self::try_new(VaccinationInput {
            vaccine_name: &vaccine_name,
            administered_on,
            next_due_on,
            vet_name: value.vet_name.as_deref(),
            notes: value.notes.as_deref(),
        })?)
    }
}

/// A pet's medical history, newest visit first.
#[utoipa::path(
    get,
    path = "/api/pet/{id}/medical",
    params(("id" = PetId, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Medical records", body = [MedicalRecord]),
        (status = 403, description = "Neither owner nor admin", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["records"],
    operation_id = "listMedicalRecords"
)]
pub async fn list_medical(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
) -> ApiResult<web::Json<Vec<MedicalRecord>>> {
    let records = state
        .records
        .list_medical(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(records))
}

/// Add a medical record.
#[utoipa::path(
    post,
    path = "/api/pet/{id}/medical",
    params(("id" = PetId, Path, description = "Pet identifier")),
    request_body = MedicalRecordRequest,
    responses(
        (status = 201, description = "Record created", body = MedicalRecord),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Neither owner nor admin", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["records"],
    operation_id = "addMedicalRecord"
)]
pub async fn add_medical(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
    payload: web::Json<MedicalRecordRequest>,
) -> ApiResult<HttpResponse> {
    let draft = MedicalRecordDraft::try_from(payload.into_inner())?;
    let record = state
        .records
        .add_medical(current.user(), &path.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Replace a medical record.
#[utoipa::path(
    put,
    path = "/api/pet/{id}/medical/{recordId}",
    params(
        ("id" = PetId, Path, description = "Pet identifier"),
        ("recordId" = RecordId, Path, description = "Record identifier")
    ),
    request_body = MedicalRecordRequest,
    responses(
        (status = 200, description = "Updated record", body = MedicalRecord),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown pet or record", body = Error)
    ),
    tags = ["records"],
    operation_id = "updateMedicalRecord"
)]
pub async fn update_medical(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<(PetId, RecordId)>,
    payload: web::Json<MedicalRecordRequest>,
) -> ApiResult<web::Json<MedicalRecord>> {
    let (pet_id, record_id) = path.into_inner();
    let draft = MedicalRecordDraft::try_from(payload.into_inner())?;
    let record = state
        .records
        .update_medical(current.user(), &pet_id, &record_id, draft)
        .await?;
    Ok(web::Json(record))
}

/// Remove a medical record.
#[utoipa::path(
    delete,
    path = "/api/pet/{id}/medical/{recordId}",
    params(
        ("id" = PetId, Path, description = "Pet identifier"),
        ("recordId" = RecordId, Path, description = "Record identifier")
    ),
    responses(
        (status = 204, description = "Record removed"),
        (status = 404, description = "Unknown pet or record", body = Error)
    ),
    tags = ["records"],
    operation_id = "deleteMedicalRecord"
)]
pub async fn delete_medical(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<(PetId, RecordId)>,
) -> ApiResult<HttpResponse> {
    let (pet_id, record_id) = path.into_inner();
    state
        .records
        .delete_medical(current.user(), &pet_id, &record_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// A pet's vaccinations, most recent first.
#[utoipa::path(
    get,
    path = "/api/pet/{id}/vaccination",
    params(("id" = PetId, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Vaccinations", body = [VaccinationView]),
        (status = 403, description = "Neither owner nor admin", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["records"],
    operation_id = "listVaccinations"
)]
pub async fn list_vaccinations(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
) -> ApiResult<web::Json<Vec<VaccinationView>>> {
    let records = state
        .records
        .list_vaccinations(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(records))
}

/// Add a vaccination record.
#[utoipa::path(
    post,
    path = "/api/pet/{id}/vaccination",
    params(("id" = PetId, Path, description = "Pet identifier")),
    request_body = VaccinationRequest,
    responses(
        (status = 201, description = "Record created", body = VaccinationView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown pet", body = Error)
    ),
    tags = ["records"],
    operation_id = "addVaccination"
)]
pub async fn add_vaccination(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PetId>,
    payload: web::Json<VaccinationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = VaccinationRecordDraft::try_from(payload.into_inner())?;
    let record = state
        .records
        .add_vaccination(current.user(), &path.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Replace a vaccination record.
#[utoipa::path(
    put,
    path = "/api/pet/{id}/vaccination/{recordId}",
    params(
        ("id" = PetId, Path, description = "Pet identifier"),
        ("recordId" = RecordId, Path, description = "Record identifier")
    ),
    request_body = VaccinationRequest,
    responses(
        (status = 200, description = "Updated record", body = VaccinationView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown pet or record", body = Error)
    ),
    tags = ["records"],
    operation_id = "updateVaccination"
)]
pub async fn update_vaccination(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<(PetId, RecordId)>,
    payload: web::Json<VaccinationRequest>,
) -> ApiResult<web::Json<VaccinationView>> {
    let (pet_id, record_id) = path.into_inner();
    let draft = VaccinationRecordDraft::try_from(payload.into_inner())?;
    let record = state
        .records
        .update_vaccination(current.user(), &pet_id, &record_id, draft)
        .await?;
    Ok(web::Json(record))
}

/// Remove a vaccination record.
#[utoipa::path(
    delete,
    path = "/api/pet/{id}/vaccination/{recordId}",
    params(
        ("id" = PetId, Path, description = "Pet identifier"),
        ("recordId" = RecordId, Path, description = "Record identifier")
    ),
    responses(
        (status = 204, description = "Record removed"),
        (status = 404, description = "Unknown pet or record", body = Error)
    ),
    tags = ["records"],
    operation_id = "deleteVaccination"
)]
pub async fn delete_vaccination(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<(PetId, RecordId)>,
) -> ApiResult<HttpResponse> {
    let (pet_id, record_id) = path.into_inner();
    state
        .records
        .delete_vaccination(current.user(), &pet_id, &record_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
