//! Behavioural tests for the shop application workflow: apply, review,
//! promote and close.

#[path = "support/api.rs"]
mod api;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use api::{ADMIN_NAME, Account, HarnessConfig, authed, id_of, post_json, register, send, start};
use rstest::rstest;
use rstest_bdd_macros::{given, then};
use serde_json::{Value, json};

#[given("an application for {shop_name}")]
fn an_application_for(shop_name: &str) -> Value {
    json!({
        "shopName": shop_name,
        "description": "Grooming and baths",
        "phone": "555-0100",
    })
}

#[then("the application awaits review")]
fn the_application_awaits_review(application: &Value) {
    assert_eq!(application["status"], "pending");
    assert!(application["reviewedAt"].is_null());
}

#[then("the request conflicts because of {reason}")]
fn the_request_conflicts_because_of(response: &(StatusCode, Value), reason: &str) {
    let (status, body) = response;
    assert_eq!(*status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["details"]["code"], reason);
}

#[then("the account owns a shop: {owns}")]
fn the_account_owns_a_shop(profile: &Value, owns: bool) {
    assert_eq!(profile["isShopOwner"], owns);
}

async fn me<S, B>(app: &S, account: &Account) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = authed(TestRequest::get().uri("/api/user/me"), &account.token);
    let (status, profile) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    profile
}

#[rstest]
#[actix_web::test]
async fn an_approved_application_opens_a_shop() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let root = register(&app, ADMIN_NAME).await;
    let ada = register(&app, "ada").await;

    let application = post_json(
        &app,
        &ada,
        "/api/shop/apply",
        an_application_for("Paws & Claws"),
        StatusCode::CREATED,
    )
    .await;
    the_application_awaits_review(&application);

    let again = send(
        &app,
        authed(
            TestRequest::post()
                .uri("/api/shop/apply")
                .set_json(an_application_for("Second Try")),
            &ada.token,
        ),
    )
    .await;
    the_request_conflicts_because_of(&again, "application_pending");

    let approve_path = format!("/api/admin/applications/{}/approve", id_of(&application));
    let shop = post_json(&app, &root, &approve_path, json!({}), StatusCode::OK).await;
    assert_eq!(shop["name"], "Paws & Claws");
    assert_eq!(shop["ownerId"], ada.id.as_str());
    assert_eq!(shop["phone"], "555-0100");
    the_account_owns_a_shop(&me(&app, &ada).await, true);

    let replay = send(&app, authed(TestRequest::post().uri(&approve_path), &root.token)).await;
    the_request_conflicts_because_of(&replay, "application_not_pending");

    let owner_again = send(
        &app,
        authed(
            TestRequest::post()
                .uri("/api/shop/apply")
                .set_json(an_application_for("Another Shop")),
            &ada.token,
        ),
    )
    .await;
    the_request_conflicts_because_of(&owner_again, "already_shop_owner");

    let (status, mine) = send(
        &app,
        authed(TestRequest::get().uri("/api/shop/mine"), &ada.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(id_of(&mine), id_of(&shop));

    let (_, applications) = send(
        &app,
        authed(TestRequest::get().uri("/api/shop/application"), &ada.token),
    )
    .await;
    assert_eq!(applications[0]["status"], "approved");
    assert!(applications[0]["reviewedAt"].is_string());
}

#[rstest]
#[actix_web::test]
async fn a_rejected_applicant_may_apply_again() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let root = register(&app, ADMIN_NAME).await;
    let ada = register(&app, "ada").await;
    let application = post_json(
        &app,
        &ada,
        "/api/shop/apply",
        an_application_for("Kibble Corner"),
        StatusCode::CREATED,
    )
    .await;

    let rejected = post_json(
        &app,
        &root,
        &format!("/api/admin/applications/{}/reject", id_of(&application)),
        json!({"note": "Please add an address"}),
        StatusCode::OK,
    )
    .await;
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["reviewNote"], "Please add an address");

    let retry = post_json(
        &app,
        &ada,
        "/api/shop/apply",
        an_application_for("Kibble Corner"),
        StatusCode::CREATED,
    )
    .await;
    the_application_awaits_review(&retry);

    let (_, pending) = send(
        &app,
        authed(
            TestRequest::get().uri("/api/admin/applications?status=pending"),
            &root.token,
        ),
    )
    .await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn closing_a_shop_removes_promotions_and_the_owner_flag() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let root = register(&app, ADMIN_NAME).await;
    let ada = register(&app, "ada").await;
    let bob = register(&app, "bob").await;
    let application = post_json(
        &app,
        &ada,
        "/api/shop/apply",
        an_application_for("Treat Street"),
        StatusCode::CREATED,
    )
    .await;
    let shop = post_json(
        &app,
        &root,
        &format!("/api/admin/applications/{}/approve", id_of(&application)),
        json!({}),
        StatusCode::OK,
    )
    .await;
    let promotion_body = json!({"title": "Spring sale", "content": "20% off treats"});
    post_json(
        &app,
        &bob,
        "/api/promotion",
        promotion_body.clone(),
        StatusCode::FORBIDDEN,
    )
    .await;
    let promotion = post_json(
        &app,
        &ada,
        "/api/promotion",
        promotion_body,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(promotion["shopId"], id_of(&shop).as_str());

    let (_, listed) = send(
        &app,
        TestRequest::get().uri(&format!("/api/promotion?shopId={}", id_of(&shop))),
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, summary) = send(
        &app,
        authed(
            TestRequest::delete().uri(&format!("/api/admin/shops/{}", id_of(&shop))),
            &root.token,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["shops"], 1);
    assert_eq!(summary["promotions"], 1);
    the_account_owns_a_shop(&me(&app, &ada).await, false);
    let (status, _) = send(
        &app,
        TestRequest::get().uri(&format!("/api/shop/{}", id_of(&shop))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
