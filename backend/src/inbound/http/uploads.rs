//! Image upload and download handlers.
//!
//! ```text
//! POST /api/upload   multipart/form-data, part "file"
//! GET /uploads/{name}
//! ```
//!
//! The body is read chunk by chunk and abandoned as soon as it passes the
//! configured limit, so oversized files never sit in memory in full.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, http::header, web};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, StoredUpload, file_too_large, missing_file};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;

const FILE_PART: &str = "file";

fn malformed_multipart(err: MultipartError) -> Error {
    debug!(error = %err, "multipart body rejected");
    Error::invalid_request("malformed multipart body").with_details(json!({
        "code": "malformed_multipart",
        "reason": err.to_string(),
    }))
}

async fn read_limited(field: &mut Field, limit: u64) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_multipart)? {
        let next_len = u64::try_from(bytes.len() + chunk.len()).unwrap_or(u64::MAX);
        if next_len > limit {
            return Err(file_too_large(limit).into());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Upload an image and receive the URL to reference it by.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "Form with a `file` part"),
    responses(
        (status = 201, description = "File stored", body = StoredUpload),
        (status = 400, description = "Missing, oversized or unsupported file", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
pub async fn upload(
    state: web::Data<HttpState>,
    _current: CurrentUser,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    let limit = state.uploads.max_bytes();
    while let Some(mut field) = payload.try_next().await.map_err(malformed_multipart)? {
        if field.name() != Some(FILE_PART) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_default();
        let bytes = read_limited(&mut field, limit).await?;
        let stored = state.uploads.store(&content_type, bytes).await?;
        return Ok(HttpResponse::Created().json(stored));
    }
    Err(missing_file().into())
}

/// Serve a stored upload.
#[utoipa::path(
    get,
    path = "/uploads/{name}",
    params(("name" = String, Path, description = "Generated file name")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "Unknown file", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "fetchUpload",
    security([])
)]
pub async fn fetch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (image_type, bytes) = state.uploads.fetch(&path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(image_type.content_type())
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageType;
    use crate::domain::test_fixtures::user;
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    const BOUNDARY: &str = "pawprint-boundary";

    fn multipart_body(part: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{part}\"; filename=\"rex.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_upload(ports: MockPorts, body: Vec<u8>) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/api/upload", web::post().to(upload)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(bearer())
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request();
        actix_test::call_service(&app, request).await
    }

    fn uploading(limit: u64) -> MockPorts {
        let mut ports = MockPorts::authenticating(user("ada"));
        ports.uploads.expect_max_bytes().return_const(limit);
        ports
    }

    #[rstest]
    #[actix_web::test]
    async fn stores_the_file_part() {
        let mut ports = uploading(1024);
        ports
            .uploads
            .expect_store()
            .withf(|content_type, bytes| content_type == "image/png" && bytes == b"png-bytes")
            .returning(|content_type, bytes| {
                Ok(StoredUpload {
                    url: "/uploads/00000000-0000-0000-0000-000000000000.png".to_owned(),
                    content_type: content_type.to_owned(),
                    size: bytes.len() as u64,
                })
            });

        let response = post_upload(ports, multipart_body("file", "image/png", b"png-bytes")).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["contentType"], "image/png");
        assert_eq!(value["size"], 9);
    }

    #[rstest]
    #[case("avatar", b"png-bytes".as_slice(), 1024, "missing_file")]
    #[case("file", b"0123456789".as_slice(), 4, "file_too_large")]
    #[actix_web::test]
    async fn rejects_unusable_bodies(
        #[case] part: &str,
        #[case] data: &[u8],
        #[case] limit: u64,
        #[case] code: &str,
    ) {
        let response = post_upload(uploading(limit), multipart_body(part, "image/png", data)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn serves_stored_files_with_their_type() {
        let mut ports = MockPorts::default();
        ports
            .uploads
            .expect_fetch()
            .returning(|_| Ok((ImageType::Webp, b"webp".to_vec())));
        let app = actix_test::init_service(
            test_app(ports.into_state()).route("/uploads/{name}", web::get().to(fetch)),
        )
        .await;
        let request = actix_test::TestRequest::get()
            .uri("/uploads/00000000-0000-0000-0000-000000000000.webp")
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/webp")
        );
    }
}
