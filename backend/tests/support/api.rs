//! In-memory application harness for end-to-end API tests.
//!
//! Builds the same middleware and route stack as the server over a fresh
//! `MemoryStore`, real Argon2 hashing, real JWTs and a temporary upload
//! directory.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use mockable::DefaultClock;
use pawprint::Trace;
use pawprint::domain::Email;
use pawprint::inbound::http::configure_api;
use pawprint::inbound::http::error::{json_config, not_found, path_config, query_config};
use pawprint::inbound::http::state::{HttpState, Repositories, ServiceSupport};
use pawprint::middleware::{AllowedOrigins, Cors};
use pawprint::outbound::memory::MemoryStore;
use pawprint::outbound::security::{Argon2CredentialHasher, JwtTokenIssuer};
use pawprint::outbound::storage::CapStdUploadStore;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const APP_ORIGIN: &str = "http://localhost:8081";
pub const ADMIN_NAME: &str = "root";
pub const PASSWORD: &str = "correct horse";

/// Knobs for one harness instance.
pub struct HarnessConfig {
    pub upload_max_bytes: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            upload_max_bytes: 64 * 1024,
        }
    }
}

fn support(config: &HarnessConfig, upload_dir: &TempDir) -> ServiceSupport {
    ServiceSupport {
        hasher: Arc::new(Argon2CredentialHasher),
        tokens: Arc::new(JwtTokenIssuer::new(
            b"integration-secret-integration-secret",
            chrono::Duration::hours(1),
        )),
        clock: Arc::new(DefaultClock),
        uploads: Arc::new(CapStdUploadStore::open(upload_dir.path()).expect("upload store")),
        upload_max_bytes: config.upload_max_bytes,
        bootstrap_admin: Some(
            Email::parse(&format!("{ADMIN_NAME}@example.com")).expect("admin email"),
        ),
    }
}

/// Start an application. Keep the returned directory alive for the test.
pub async fn start(
    config: HarnessConfig,
) -> (
    impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
    TempDir,
) {
    let upload_dir = tempfile::tempdir().expect("temporary upload directory");
    let state = HttpState::assemble(
        Repositories::shared(Arc::new(MemoryStore::new())),
        support(&config, &upload_dir),
    );
    let origins = AllowedOrigins::parse(APP_ORIGIN).expect("valid origin");
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .configure(configure_api)
            .default_service(web::to(not_found))
            .wrap(Cors::new(origins))
            .wrap(Trace),
    )
    .await;
    (app, upload_dir)
}

/// Response status and JSON body (`Value::Null` when empty).
pub async fn send<S, B>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(format!("{body:?}")))
    };
    (status, value)
}

/// Attach a bearer token.
pub fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// A registered account.
pub struct Account {
    pub token: String,
    pub id: String,
}

/// Register `{name}@example.com` and return its token and id.
pub async fn register<S, B>(app: &S, name: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/auth/register").set_json(json!({
            "email": format!("{name}@example.com"),
            "username": name,
            "displayName": name,
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {name}: {body}");
    Account {
        token: body["token"].as_str().expect("token").to_owned(),
        id: body["user"]["id"].as_str().expect("user id").to_owned(),
    }
}

/// `POST path` with a JSON body as `account`, asserting the expected status.
pub async fn post_json<S, B>(
    app: &S,
    account: &Account,
    path: &str,
    body: Value,
    expected: StatusCode,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, value) = send(
        app,
        authed(TestRequest::post().uri(path).set_json(body), &account.token),
    )
    .await;
    assert_eq!(status, expected, "POST {path}: {value}");
    value
}

/// Identifier field of a JSON object.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_owned()
}
