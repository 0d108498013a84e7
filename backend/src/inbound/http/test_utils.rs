//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::User;
use crate::domain::ports::{
    MockAdminService, MockAuthService, MockFeedService, MockHealthRecordService, MockPetService,
    MockProfileService, MockShopService, MockTaskService, MockUploadService,
};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::state::HttpState;

/// Token accepted by [`MockPorts::authenticating`].
pub const TEST_TOKEN: &str = "test-token";

/// Mocked driving ports; set expectations before converting into state.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthService,
    pub profiles: MockProfileService,
    pub pets: MockPetService,
    pub records: MockHealthRecordService,
    pub feed: MockFeedService,
    pub shops: MockShopService,
    pub tasks: MockTaskService,
    pub admin: MockAdminService,
    pub uploads: MockUploadService,
}

impl MockPorts {
    /// Ports whose auth service resolves [`TEST_TOKEN`] to `user`.
    pub fn authenticating(user: User) -> Self {
        let mut ports = Self::default();
        ports
            .auth
            .expect_authenticate()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(user.clone()));
        ports
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            auth: Arc::new(self.auth),
            profiles: Arc::new(self.profiles),
            pets: Arc::new(self.pets),
            records: Arc::new(self.records),
            feed: Arc::new(self.feed),
            shops: Arc::new(self.shops),
            tasks: Arc::new(self.tasks),
            admin: Arc::new(self.admin),
            uploads: Arc::new(self.uploads),
        })
    }
}

/// App with the state and extractor configs the server installs.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TEST_TOKEN}"))
}
