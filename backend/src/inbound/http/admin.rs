//! Administration handlers. Every route requires an admin bearer token; the
//! admin check itself lives in the domain service.
//!
//! ```text
//! GET /api/admin/users
//! PUT /api/admin/users/{id}/admin {"isAdmin":true}
//! DELETE /api/admin/users/{id}
//! DELETE /api/admin/posts/{id}
//! GET /api/admin/applications?status=pending
//! POST /api/admin/applications/{id}/approve
//! POST /api/admin/applications/{id}/reject {"note":"Incomplete address"}
//! DELETE /api/admin/shops/{id}
//! GET /api/admin/stats
//! ```

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, Error, FieldError, PlatformStats, PostId,
    Shop, ShopApplication, ShopId, User, UserId, review_note,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Admin flag body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: Option<bool>,
}

/// Rejection body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RejectRequest {
    pub note: Option<String>,
}

/// Application filter.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationParams {
    pub status: Option<String>,
}

impl ApplicationParams {
    fn status(&self) -> Result<Option<ApplicationStatus>, Error> {
        self.status
            .as_deref()
            .map(|raw| {
                ApplicationStatus::from_storage(raw).ok_or_else(|| {
                    Error::from(FieldError::new(
                        "status",
                        "invalid_status",
                        "status must be pending, approved or rejected",
                    ))
                })
            })
            .transpose()
    }
}

/// Every account, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [User]),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
pub async fn list_users(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.admin.list_users(current.user()).await?;
    Ok(web::Json(users))
}

/// Grant or revoke the admin flag.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/admin",
    params(("id" = UserId, Path, description = "User identifier")),
    request_body = SetAdminRequest,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 400, description = "Missing flag or self-demotion", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetAdmin"
)]
pub async fn set_admin(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<UserId>,
    payload: web::Json<SetAdminRequest>,
) -> ApiResult<web::Json<User>> {
    let is_admin = require(payload.into_inner().is_admin, FieldName::new("isAdmin"))?;
    let user = state
        .admin
        .set_admin(current.user(), &path.into_inner(), is_admin)
        .await?;
    Ok(web::Json(user))
}

/// Delete an account with the full cascade.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = UserId, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 400, description = "Self-deletion", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
pub async fn delete_user(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state
        .admin
        .delete_user(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(summary))
}

/// Delete any post.
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeletePost"
)]
pub async fn delete_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state
        .admin
        .delete_post(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(summary))
}

/// Shop applications, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/applications",
    params(("status" = Option<ApplicationStatus>, Query, description = "Only applications in this state")),
    responses(
        (status = 200, description = "Applications", body = [ShopApplication]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListApplications"
)]
pub async fn list_applications(
    state: web::Data<HttpState>,
    current: CurrentUser,
    params: web::Query<ApplicationParams>,
) -> ApiResult<web::Json<Vec<ShopApplication>>> {
    let status = params.status()?;
    let applications = state
        .admin
        .list_applications(current.user(), status)
        .await?;
    Ok(web::Json(applications))
}

/// Approve a pending application and open the shop.
#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/approve",
    params(("id" = ApplicationId, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Shop opened", body = Shop),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown application", body = Error),
        (status = 409, description = "Not pending or applicant already owns a shop", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminApproveApplication"
)]
pub async fn approve_application(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<ApplicationId>,
) -> ApiResult<web::Json<Shop>> {
    let shop = state
        .admin
        .approve_application(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(shop))
}

/// Reject a pending application.
#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/reject",
    params(("id" = ApplicationId, Path, description = "Application identifier")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Application rejected", body = ShopApplication),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown application", body = Error),
        (status = 409, description = "Not pending", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminRejectApplication"
)]
pub async fn reject_application(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<ApplicationId>,
    payload: Option<web::Json<RejectRequest>>,
) -> ApiResult<web::Json<ShopApplication>> {
    let raw = payload.and_then(|body| body.into_inner().note);
    let note = review_note(raw.as_deref())?;
    let application = state
        .admin
        .reject_application(current.user(), &path.into_inner(), note)
        .await?;
    Ok(web::Json(application))
}

/// Close a shop.
#[utoipa::path(
    delete,
    path = "/api/admin/shops/{id}",
    params(("id" = ShopId, Path, description = "Shop identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown shop", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteShop"
)]
pub async fn delete_shop(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<ShopId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state
        .admin
        .delete_shop(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(summary))
}

/// Platform counters.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Counters", body = PlatformStats),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
pub async fn stats(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<PlatformStats>> {
    let stats = state.admin.stats(current.user()).await?;
    Ok(web::Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{admin, user};
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some("approved"), Ok(Some(ApplicationStatus::Approved)))]
    #[case(Some("open"), Err(()))]
    fn status_filters_are_parsed(
        #[case] raw: Option<&str>,
        #[case] expected: Result<Option<ApplicationStatus>, ()>,
    ) {
        let params = ApplicationParams {
            status: raw.map(str::to_owned),
        };
        assert_eq!(params.status().map_err(|_| ()), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_admins_are_forbidden() {
        let mut ports = MockPorts::authenticating(user("ada"));
        ports
            .admin
            .expect_stats()
            .returning(|_| Err(Error::forbidden("admin access required")));
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/api/admin/stats", web::get().to(stats)),
        )
        .await;
        let request = actix_test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header(bearer())
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn set_admin_requires_the_flag() {
        let app = actix_test::init_service(
            test_app(MockPorts::authenticating(admin("root")).into_state())
                .route("/api/admin/users/{id}/admin", web::put().to(set_admin)),
        )
        .await;
        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/admin/users/{}/admin", UserId::random()))
            .insert_header(bearer())
            .set_json(json!({}))
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["details"]["field"], "isAdmin");
    }

    #[rstest]
    #[actix_web::test]
    async fn rejection_note_is_optional() {
        let mut ports = MockPorts::authenticating(admin("root"));
        ports
            .admin
            .expect_reject_application()
            .withf(|_, _, note| note.is_none())
            .returning(|_, _, _| Err(Error::conflict("application is not pending")));
        let app = actix_test::init_service(test_app(ports.into_state()).route(
            "/api/admin/applications/{id}/reject",
            web::post().to(reject_application),
        ))
        .await;
        let request = actix_test::TestRequest::post()
            .uri(&format!(
                "/api/admin/applications/{}/reject",
                ApplicationId::random()
            ))
            .insert_header(bearer())
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
