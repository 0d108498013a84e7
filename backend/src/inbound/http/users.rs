//! Profile handlers.
//!
//! ```text
//! GET /api/user/me
//! PUT /api/user/me {"displayName":"Ada","bio":""}
//! DELETE /api/user/me
//! GET /api/user/{id}
//! GET /api/user/{id}/pets
//! ```

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DeletionSummary, Error, Pet, ProfilePatch, PublicProfile, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;

/// Profile update body. Empty `bio` or `avatarUrl` clears the field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfilePatch {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(
            value.display_name.as_deref(),
            value.bio.as_deref(),
            value.avatar_url.as_deref(),
        )?)
    }
}

/// The caller's private profile.
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Private profile", body = User),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
pub async fn current_user(current: CurrentUser) -> web::Json<User> {
    web::Json(current.0)
}

/// Update the caller's profile.
#[utoipa::path(
    put,
    path = "/api/user/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let patch = ProfilePatch::try_from(payload.into_inner())?;
    let user = state.profiles.update_profile(current.user(), patch).await?;
    Ok(web::Json(user))
}

/// Delete the caller's account and everything it owns.
#[utoipa::path(
    delete,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteCurrentUser"
)]
pub async fn delete_current_user(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state.profiles.delete_account(current.user()).await?;
    Ok(web::Json(summary))
}

/// Another user's public profile.
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = UserId, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "publicProfile",
    security([])
)]
pub async fn public_profile(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<PublicProfile>> {
    let profile = state.profiles.public_profile(&path.into_inner()).await?;
    Ok(web::Json(profile))
}

/// Pets owned by a user.
#[utoipa::path(
    get,
    path = "/api/user/{id}/pets",
    params(("id" = UserId, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Pets, newest first", body = [Pet]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "userPets",
    security([])
)]
pub async fn user_pets(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<Vec<Pet>>> {
    let pets = state.profiles.user_pets(&path.into_inner()).await?;
    Ok(web::Json(pets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::user;
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn app(
        ports: MockPorts,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        actix_test::init_service(
            test_app(ports.into_state())
                .route("/api/user/me", web::get().to(current_user))
                .route("/api/user/me", web::put().to(update_current_user))
                .route("/api/user/{id}", web::get().to(public_profile)),
        )
        .await
    }

    #[rstest]
    #[actix_web::test]
    async fn me_returns_the_private_profile() {
        let ada = user("ada");
        let app = app(MockPorts::authenticating(ada.clone())).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/user/me")
            .insert_header(bearer())
            .to_request();

        let value: Value = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(value["id"], json!(ada.id));
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["isAdmin"], false);
    }

    #[rstest]
    #[actix_web::test]
    async fn updates_forward_empty_strings_as_clears() {
        let ada = user("ada");
        let mut ports = MockPorts::authenticating(ada.clone());
        ports
            .profiles
            .expect_update_profile()
            .withf(|_, patch| patch.bio == Some(None) && patch.display_name.is_none())
            .returning(|actor, _| Ok(actor.clone()));
        let app = app(ports).await;
        let request = actix_test::TestRequest::put()
            .uri("/api/user/me")
            .insert_header(bearer())
            .set_json(json!({"bio": ""}))
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_ids_are_bad_requests() {
        let app = app(MockPorts::default()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/user/not-a-uuid")
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn public_profiles_omit_private_fields() {
        let bob = user("bob");
        let profile = bob.public_profile();
        let mut ports = MockPorts::default();
        ports
            .profiles
            .expect_public_profile()
            .returning(move |_| Ok(profile.clone()));
        let app = app(ports).await;
        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/user/{}", bob.id))
            .to_request();

        let value: Value = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(value["username"], "bob");
        assert!(value.get("email").is_none());
    }
}
