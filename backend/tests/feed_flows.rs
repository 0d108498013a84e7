//! End-to-end feed behaviour: likes, viewer flags, pet tags and threads.

#[expect(
    dead_code,
    reason = "Shared harness includes helpers used only by other suites."
)]
#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use api::{HarnessConfig, authed, id_of, post_json, register, send, start};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[actix_web::test]
async fn likes_are_idempotent_in_both_directions() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let ada = register(&app, "ada").await;
    let post = post_json(
        &app,
        &ada,
        "/api/post",
        json!({"content": "Nap time"}),
        StatusCode::CREATED,
    )
    .await;
    let like_path = format!("/api/post/{}/like", id_of(&post));

    for _ in 0..2 {
        let status = post_json(&app, &ada, &like_path, json!({}), StatusCode::OK).await;
        assert_eq!(status, json!({"liked": true, "likeCount": 1}));
    }
    for _ in 0..2 {
        let (code, status) =
            send(&app, authed(TestRequest::delete().uri(&like_path), &ada.token)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(status, json!({"liked": false, "likeCount": 0}));
    }
}

#[rstest]
#[actix_web::test]
async fn liked_by_me_follows_the_viewer() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let ada = register(&app, "ada").await;
    let bob = register(&app, "bob").await;
    let post = post_json(
        &app,
        &ada,
        "/api/post",
        json!({"content": "Bath day"}),
        StatusCode::CREATED,
    )
    .await;
    post_json(
        &app,
        &bob,
        &format!("/api/post/{}/like", id_of(&post)),
        json!({}),
        StatusCode::OK,
    )
    .await;

    let (_, anonymous) = send(&app, TestRequest::get().uri("/api/post")).await;
    let (_, as_bob) = send(&app, authed(TestRequest::get().uri("/api/post"), &bob.token)).await;
    let (_, as_ada) = send(&app, authed(TestRequest::get().uri("/api/post"), &ada.token)).await;

    assert_eq!(anonymous[0]["likedByMe"], false);
    assert_eq!(anonymous[0]["likeCount"], 1);
    assert_eq!(anonymous[0]["author"]["username"], "ada");
    assert_eq!(as_bob[0]["likedByMe"], true);
    assert_eq!(as_ada[0]["likedByMe"], false);
}

#[rstest]
#[actix_web::test]
async fn feed_is_newest_first_and_paginated() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let ada = register(&app, "ada").await;
    for text in ["first", "second", "third"] {
        post_json(
            &app,
            &ada,
            "/api/post",
            json!({"content": text}),
            StatusCode::CREATED,
        )
        .await;
    }

    let (status, page) = send(&app, TestRequest::get().uri("/api/post?limit=2&offset=1")).await;

    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = page
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["content"].as_str())
        .collect();
    assert_eq!(contents, ["second", "first"]);
}

#[rstest]
#[actix_web::test]
async fn posts_may_only_tag_the_authors_pets() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let ada = register(&app, "ada").await;
    let bob = register(&app, "bob").await;
    let rex = post_json(
        &app,
        &ada,
        "/api/pet",
        json!({"name": "Rex", "species": "dog"}),
        StatusCode::CREATED,
    )
    .await;

    let error = post_json(
        &app,
        &bob,
        "/api/post",
        json!({"content": "Not my dog", "petId": id_of(&rex)}),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(error["details"]["code"], "invalid_pet");
}

#[rstest]
#[actix_web::test]
async fn post_authors_moderate_their_threads() {
    let (app, _uploads) = start(HarnessConfig::default()).await;
    let ada = register(&app, "ada").await;
    let bob = register(&app, "bob").await;
    let carol = register(&app, "carol").await;
    let post = post_json(
        &app,
        &ada,
        "/api/post",
        json!({"content": "Adopted!"}),
        StatusCode::CREATED,
    )
    .await;
    let post_id = id_of(&post);
    let comment = post_json(
        &app,
        &bob,
        &format!("/api/post/{post_id}/comment"),
        json!({"content": "Congrats"}),
        StatusCode::CREATED,
    )
    .await;
    let comment_id = id_of(&comment);
    post_json(
        &app,
        &carol,
        &format!("/api/comment/{comment_id}/reply"),
        json!({"content": "Same!"}),
        StatusCode::CREATED,
    )
    .await;

    let (_, comments) = send(
        &app,
        TestRequest::get().uri(&format!("/api/post/{post_id}/comment")),
    )
    .await;
    assert_eq!(comments[0]["replyCount"], 1);

    let (status, _) = send(
        &app,
        authed(
            TestRequest::delete().uri(&format!("/api/comment/{comment_id}")),
            &carol.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, summary) = send(
        &app,
        authed(
            TestRequest::delete().uri(&format!("/api/comment/{comment_id}")),
            &ada.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["comments"], 1);
    assert_eq!(summary["replies"], 1);

    let (_, comments) = send(
        &app,
        TestRequest::get().uri(&format!("/api/post/{post_id}/comment")),
    )
    .await;
    assert_eq!(comments, Value::Array(Vec::new()));
}
