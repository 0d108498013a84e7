//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod pets;
pub mod posts;
pub mod records;
pub mod shops;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Resource, web};

use self::error::method_not_allowed;

/// Resource whose unsupported methods answer with a JSON `405`.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

/// Register every REST route and the upload file route.
///
/// Literal shop segments are registered ahead of `/api/shop/{id}` so they
/// are never parsed as identifiers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use pawprint::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/api/auth/register").route(web::post().to(accounts::register)))
        .service(resource("/api/auth/login").route(web::post().to(accounts::login)))
        .service(
            resource("/api/user/me")
                .route(web::get().to(users::current_user))
                .route(web::put().to(users::update_current_user))
                .route(web::delete().to(users::delete_current_user)),
        )
        .service(resource("/api/user/{id}").route(web::get().to(users::public_profile)))
        .service(resource("/api/user/{id}/pets").route(web::get().to(users::user_pets)))
        .service(
            resource("/api/pet")
                .route(web::get().to(pets::list_pets))
                .route(web::post().to(pets::create_pet)),
        )
        .service(
            resource("/api/pet/{id}")
                .route(web::get().to(pets::get_pet))
                .route(web::put().to(pets::update_pet))
                .route(web::delete().to(pets::delete_pet)),
        )
        .service(
            resource("/api/pet/{id}/medical")
                .route(web::get().to(records::list_medical))
                .route(web::post().to(records::add_medical)),
        )
        .service(
            resource("/api/pet/{id}/medical/{recordId}")
                .route(web::put().to(records::update_medical))
                .route(web::delete().to(records::delete_medical)),
        )
        .service(
            resource("/api/pet/{id}/vaccination")
                .route(web::get().to(records::list_vaccinations))
                .route(web::post().to(records::add_vaccination)),
        )
        .service(
            resource("/api/pet/{id}/vaccination/{recordId}")
                .route(web::put().to(records::update_vaccination))
                .route(web::delete().to(records::delete_vaccination)),
        )
        .configure(configure_feed)
        .configure(configure_shops)
        .service(
            resource("/api/task")
                .route(web::get().to(tasks::list_tasks))
                .route(web::post().to(tasks::create_task)),
        )
        .service(
            resource("/api/task/{id}")
                .route(web::put().to(tasks::update_task))
                .route(web::delete().to(tasks::delete_task)),
        )
        .configure(configure_admin)
        .service(resource("/api/upload").route(web::post().to(uploads::upload)))
        .service(resource("/uploads/{name}").route(web::get().to(uploads::fetch)));
}

fn configure_feed(cfg: &mut web::ServiceConfig) {
    cfg.service(
        resource("/api/post")
            .route(web::get().to(posts::list_feed))
            .route(web::post().to(posts::create_post)),
    )
    .service(
        resource("/api/post/{id}")
            .route(web::get().to(posts::get_post))
            .route(web::put().to(posts::update_post))
            .route(web::delete().to(posts::delete_post)),
    )
    .service(
        resource("/api/post/{id}/like")
            .route(web::post().to(posts::like_post))
            .route(web::delete().to(posts::unlike_post)),
    )
    .service(
        resource("/api/post/{id}/comment")
            .route(web::get().to(posts::list_comments))
            .route(web::post().to(posts::add_comment)),
    )
    .service(resource("/api/comment/{id}").route(web::delete().to(posts::delete_comment)))
    .service(
        resource("/api/comment/{id}/reply")
            .route(web::get().to(posts::list_replies))
            .route(web::post().to(posts::add_reply)),
    )
    .service(resource("/api/reply/{id}").route(web::delete().to(posts::delete_reply)));
}

fn configure_shops(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/api/shop/apply").route(web::post().to(shops::apply)))
        .service(resource("/api/shop/application").route(web::get().to(shops::my_applications)))
        .service(resource("/api/shop/mine").route(web::get().to(shops::my_shop)))
        .service(resource("/api/shop").route(web::get().to(shops::list_shops)))
        .service(
            resource("/api/shop/{id}")
                .route(web::get().to(shops::get_shop))
                .route(web::put().to(shops::update_shop)),
        )
        .service(
            resource("/api/promotion")
                .route(web::get().to(shops::list_promotions))
                .route(web::post().to(shops::create_promotion)),
        )
        .service(resource("/api/promotion/{id}").route(web::delete().to(shops::delete_promotion)));
}

fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/api/admin/users").route(web::get().to(admin::list_users)))
        .service(resource("/api/admin/users/{id}").route(web::delete().to(admin::delete_user)))
        .service(resource("/api/admin/users/{id}/admin").route(web::put().to(admin::set_admin)))
        .service(resource("/api/admin/posts/{id}").route(web::delete().to(admin::delete_post)))
        .service(
            resource("/api/admin/applications").route(web::get().to(admin::list_applications)),
        )
        .service(
            resource("/api/admin/applications/{id}/approve")
                .route(web::post().to(admin::approve_application)),
        )
        .service(
            resource("/api/admin/applications/{id}/reject")
                .route(web::post().to(admin::reject_application)),
        )
        .service(resource("/api/admin/shops/{id}").route(web::delete().to(admin::delete_shop)))
        .service(resource("/api/admin/stats").route(web::get().to(admin::stats)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::user;
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn unsupported_methods_answer_405() {
        let state = MockPorts::default().into_state();
        let app = actix_test::init_service(test_app(state).configure(configure_api)).await;
        let request = actix_test::TestRequest::patch().uri("/api/pet").to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "method_not_allowed");
    }

    #[rstest]
    #[actix_web::test]
    async fn literal_shop_segments_win_over_identifiers() {
        let mut ports = MockPorts::authenticating(user("ada"));
        ports
            .shops
            .expect_my_shop()
            .returning(|_| Err(crate::domain::Error::not_found("no shop")));
        let state = ports.into_state();
        let app = actix_test::init_service(test_app(state).configure(configure_api)).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/shop/mine")
            .insert_header(bearer())
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "no shop");
    }
}
