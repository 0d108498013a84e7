//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for accounts, pets, the social
//! feed, shops and care tasks, together with the services that enforce
//! ownership and workflow rules over the repository ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - `*ServiceImpl` — driving port implementations generic over repositories.
//! - `ports` — driving and driven port traits.

pub mod error;
pub mod ports;

mod access;
mod admin_service;
mod auth;
mod auth_service;
mod deletion;
mod feed;
mod feed_service;
mod health_record;
mod health_record_service;
mod ids;
mod pet;
mod pet_service;
mod profile_service;
mod repository_errors;
mod shop;
mod shop_service;
mod task;
mod task_service;
mod trace_id;
mod upload;
mod upload_service;
mod user;
mod validation;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::admin_service::AdminServiceImpl;
pub use self::auth::{AuthSession, LoginCredentials, Password, Registration, TokenClaims};
pub use self::auth_service::AuthServiceImpl;
pub use self::deletion::{DeletionSummary, PlatformStats};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feed::{
    Comment, CommentView, FeedQuery, LikeStatus, Post, PostDraft, PostPatch, PostView, Reply,
    ReplyView, comment_content,
};
pub use self::feed_service::FeedServiceImpl;
pub use self::health_record::{
    MedicalRecord, MedicalRecordDraft, VaccinationInput, VaccinationRecord,
    VaccinationRecordDraft, VaccinationView,
};
pub use self::health_record_service::HealthRecordServiceImpl;
pub use self::ids::{
    ApplicationId, CommentId, PetId, PostId, PromotionId, RecordId, ReplyId, ShopId, TaskId,
    UserId,
};
pub use self::pet::{Gender, Pet, PetDraft, PetInput, PetPatch, PetPatchInput};
pub use self::pet_service::PetServiceImpl;
pub use self::profile_service::ProfileServiceImpl;
pub use self::shop::{
    ApplicationStatus, PromotionDraft, PromotionalPost, Shop, ShopApplication,
    ShopApplicationDraft, ShopDetails, ShopPatch, ShopPatchInput, review_note,
};
pub use self::shop_service::ShopServiceImpl;
pub use self::task::{Task, TaskDraft, TaskFilter, TaskPatch, TaskPatchInput, task_order};
pub use self::task_service::TaskServiceImpl;
pub use self::trace_id::TraceId;
pub use self::upload::{
    ImageType, StoredName, StoredUpload, UPLOAD_URL_PREFIX, file_too_large,
};
pub use self::upload_service::{UploadServiceImpl, missing_file};
pub use self::user::{
    AuthorSummary, DisplayName, Email, ProfilePatch, PublicProfile, StoredCredentials, User,
    Username,
};
pub use self::validation::FieldError;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pawprint::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
