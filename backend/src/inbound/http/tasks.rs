//! Care task handlers. Tasks are private to their owner.
//!
//! ```text
//! GET /api/task?completed=false&petId=<uuid>
//! POST /api/task {"title":"Flea treatment","dueAt":"2026-05-01T09:00:00Z"}
//! PUT /api/task/{id} {"completed":true}
//! DELETE /api/task/{id}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, PetId, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, TaskPatchInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, parse_optional_rfc3339_timestamp, require,
};

const DUE_AT: FieldName = FieldName::new("dueAt");

/// List filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskParams {
    pub completed: Option<bool>,
    pub pet_id: Option<PetId>,
}

impl From<TaskParams> for TaskFilter {
    fn from(value: TaskParams) -> Self {
        Self {
            completed: value.completed,
            pet_id: value.pet_id,
        }
    }
}

/// New task body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp.
    pub due_at: Option<String>,
    pub pet_id: Option<PetId>,
}

impl TryFrom<CreateTaskRequest> for TaskDraft {
    type Error = Error;

    fn try_from(value: CreateTaskRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, FieldName::new("title"))?;
        let due_at = parse_optional_rfc3339_timestamp(value.due_at.as_deref(), DUE_AT)?;
        Ok(Self::try_from_parts(
            &title,
            value.description.as_deref(),
            due_at,
            value.pet_id,
        )?)
    }
}

/// Task edit body. `null` clears `dueAt` and `petId`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_at: Option<Option<String>>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub pet_id: Option<Option<PetId>>,
}

impl TryFrom<UpdateTaskRequest> for TaskPatch {
    type Error = Error;

    fn try_from(value: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let due_at = value
            .due_at
            .map(|raw| parse_optional_rfc3339_timestamp(raw.as_deref(), DUE_AT))
            .transpose()?;
        Ok(Self::try_new(TaskPatchInput {
            title: value.title.as_deref(),
            description: value.description.as_deref(),
            due_at,
            completed: value.completed,
            pet_id: value.pet_id,
        })?)
    }
}

/// The caller's tasks: incomplete first, then by due date.
#[utoipa::path(
    get,
    path = "/api/task",
    params(
        ("completed" = Option<bool>, Query, description = "Only tasks in this state"),
        ("petId" = Option<PetId>, Query, description = "Only tasks for this pet")
    ),
    responses(
        (status = 200, description = "Tasks", body = [Task]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    current: CurrentUser,
    params: web::Query<TaskParams>,
) -> ApiResult<web::Json<Vec<Task>>> {
    let tasks = state
        .tasks
        .list(current.user(), params.into_inner().into())
        .await?;
    Ok(web::Json(tasks))
}

/// Create a task.
#[utoipa::path(
    post,
    path = "/api/task",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid request or foreign pet", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
pub async fn create_task(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TaskDraft::try_from(payload.into_inner())?;
    let task = state.tasks.create(current.user(), draft).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Update a task.
#[utoipa::path(
    put,
    path = "/api/task/{id}",
    params(("id" = TaskId, Path, description = "Task identifier")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
pub async fn update_task(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<TaskId>,
    payload: web::Json<UpdateTaskRequest>,
) -> ApiResult<web::Json<Task>> {
    let patch = TaskPatch::try_from(payload.into_inner())?;
    let task = state
        .tasks
        .update(current.user(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(task))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/task/{id}",
    params(("id" = TaskId, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task removed"),
        (status = 404, description = "Unknown task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
pub async fn delete_task(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<TaskId>,
) -> ApiResult<HttpResponse> {
    state
        .tasks
        .delete(current.user(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
