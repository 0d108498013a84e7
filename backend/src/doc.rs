//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response
//! schemas, and the bearer token security scheme. The document backs Swagger
//! UI in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ApplicationId, ApplicationStatus, AuthSession, AuthorSummary, Comment, CommentId, CommentView,
    DeletionSummary, Error, ErrorCode, Gender, LikeStatus, MedicalRecord, Pet, PetId,
    PlatformStats, Post, PostId, PostView, PromotionId, PromotionalPost, PublicProfile, RecordId,
    Reply, ReplyId, ReplyView, Shop, ShopApplication, ShopDetails, ShopId, StoredUpload, Task,
    TaskId, User, UserId, VaccinationRecord, VaccinationView,
};
use crate::inbound::http::{
    accounts, admin, health, pets, posts, records, shops, tasks, uploads, users,
};

pub(crate) const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pawprint API",
        description = "Pet profiles, health records, the social feed, shops and care tasks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        accounts::register,
        accounts::login,
        users::current_user,
        users::update_current_user,
        users::delete_current_user,
        users::public_profile,
        users::user_pets,
        pets::list_pets,
        pets::create_pet,
        pets::get_pet,
        pets::update_pet,
        pets::delete_pet,
        records::list_medical,
        records::add_medical,
        records::update_medical,
        records::delete_medical,
        records::list_vaccinations,
        records::add_vaccination,
        records::update_vaccination,
        records::delete_vaccination,
        posts::list_feed,
        posts::create_post,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
        posts::like_post,
        posts::unlike_post,
        posts::list_comments,
        posts::add_comment,
        posts::delete_comment,
        posts::list_replies,
        posts::add_reply,
        posts::delete_reply,
        shops::apply,
        shops::my_applications,
        shops::list_shops,
        shops::my_shop,
        shops::get_shop,
        shops::update_shop,
        shops::list_promotions,
        shops::create_promotion,
        shops::delete_promotion,
        tasks::list_tasks,
        tasks::create_task,
        tasks::update_task,
        tasks::delete_task,
        admin::list_users,
        admin::set_admin,
        admin::delete_user,
        admin::delete_post,
        admin::list_applications,
        admin::approve_application,
        admin::reject_application,
        admin::delete_shop,
        admin::stats,
        uploads::upload,
        uploads::fetch,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserId,
        PetId,
        RecordId,
        PostId,
        CommentId,
        ReplyId,
        ShopId,
        ApplicationId,
        PromotionId,
        TaskId,
        AuthSession,
        User,
        PublicProfile,
        AuthorSummary,
        Gender,
        Pet,
        MedicalRecord,
        VaccinationRecord,
        VaccinationView,
        Post,
        PostView,
        LikeStatus,
        Comment,
        CommentView,
        Reply,
        ReplyView,
        ApplicationStatus,
        ShopDetails,
        ShopApplication,
        Shop,
        PromotionalPost,
        Task,
        StoredUpload,
        DeletionSummary,
        PlatformStats,
        accounts::RegisterRequest,
        accounts::LoginRequest,
        users::UpdateProfileRequest,
        pets::CreatePetRequest,
        pets::UpdatePetRequest,
        records::MedicalRecordRequest,
        records::VaccinationRequest,
        posts::CreatePostRequest,
        posts::UpdatePostRequest,
        posts::ContentRequest,
        shops::ShopApplicationRequest,
        shops::UpdateShopRequest,
        shops::PromotionRequest,
        tasks::CreateTaskRequest,
        tasks::UpdateTaskRequest,
        admin::SetAdminRequest,
        admin::RejectRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Profiles and account lifecycle"),
        (name = "pets", description = "Pet profiles"),
        (name = "records", description = "Medical and vaccination records"),
        (name = "posts", description = "Posts, likes, comments and replies"),
        (name = "shops", description = "Shop applications, shops and promotions"),
        (name = "tasks", description = "Care reminders"),
        (name = "admin", description = "Moderation and platform statistics"),
        (name = "uploads", description = "Image uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
