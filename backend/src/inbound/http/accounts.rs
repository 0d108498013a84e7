//! Registration and login handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","username":"ada","displayName":"Ada","password":"correct horse"}
//! POST /api/auth/login {"email":"ada@example.com","password":"correct horse"}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, FieldName::new("email"))?;
        let username = require(value.username, FieldName::new("username"))?;
        let display_name = require(value.display_name, FieldName::new("displayName"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Ok(Self::try_from_parts(
            &email,
            &username,
            &display_name,
            &password,
        )?)
    }
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, FieldName::new("email"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Ok(Self::try_from_parts(&email, &password)?)
    }
}

/// Create an account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username taken", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Exchange credentials for a bearer token.
///
/// Unknown emails and wrong passwords produce the same `401` so callers
/// cannot probe for accounts.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.auth.login(credentials).await?;
    Ok(web::Json(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::user;
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn post_json(
        ports: MockPorts,
        uri: &str,
        body: Value,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            test_app(ports.into_state())
                .route("/api/auth/register", web::post().to(register))
                .route("/api/auth/login", web::post().to(login)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        actix_test::call_service(&app, request).await
    }

    #[rstest]
    #[case(json!({"username": "ada", "displayName": "Ada", "password": "correct horse"}), "email", "missing_field")]
    #[case(json!({"email": "ada", "username": "ada", "displayName": "Ada", "password": "correct horse"}), "email", "invalid_email")]
    #[case(json!({"email": "ada@example.com", "username": "ada!", "displayName": "Ada", "password": "correct horse"}), "username", "invalid_characters")]
    #[case(json!({"email": "ada@example.com", "username": "ada", "displayName": "Ada", "password": "short"}), "password", "invalid_length")]
    #[actix_web::test]
    async fn registration_rejects_invalid_fields(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let response = post_json(MockPorts::default(), "/api/auth/register", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
        assert_eq!(value["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn registration_returns_201_with_the_session() {
        let mut ports = MockPorts::default();
        ports.auth.expect_register().returning(|registration| {
            let mut account = user(registration.username.as_ref());
            account.email = registration.email;
            Ok(AuthSession {
                token: "signed".to_owned(),
                user: account,
            })
        });

        let response = post_json(
            ports,
            "/api/auth/register",
            json!({
                "email": "Ada@Example.com",
                "username": "ada",
                "displayName": "Ada",
                "password": "correct horse"
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["token"], "signed");
        assert_eq!(value["user"]["email"], "ada@example.com");
        assert!(value["user"].get("passwordHash").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn login_passes_service_errors_through() {
        let mut ports = MockPorts::default();
        ports
            .auth
            .expect_login()
            .returning(|_| Err(Error::unauthorized("invalid credentials")));

        let response = post_json(
            ports,
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "nope"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "invalid credentials");
    }
}
