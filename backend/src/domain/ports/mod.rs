//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens, upload storage) are
//! implemented by outbound adapters. Driving ports (the `*Service` traits)
//! are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod admin_service;
mod credential_hasher;
mod feed_service;
mod health_record_repository;
mod pet_repository;
mod pet_service;
mod post_repository;
mod shop_repository;
mod shop_service;
mod task_repository;
mod task_service;
mod token_issuer;
mod upload_service;
mod upload_store;
mod user_repository;

#[cfg(test)]
pub use account_service::{MockAuthService, MockProfileService};
pub use account_service::{AuthService, ProfileService};
#[cfg(test)]
pub use admin_service::MockAdminService;
pub use admin_service::AdminService;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use feed_service::MockFeedService;
pub use feed_service::FeedService;
#[cfg(test)]
pub use health_record_repository::MockHealthRecordRepository;
pub use health_record_repository::{HealthRecordRepository, HealthRecordRepositoryError};
#[cfg(test)]
pub use pet_repository::MockPetRepository;
pub use pet_repository::{PetRepository, PetRepositoryError};
#[cfg(test)]
pub use pet_service::{MockHealthRecordService, MockPetService};
pub use pet_service::{HealthRecordService, PetService};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use shop_repository::MockShopRepository;
pub use shop_repository::{
    ApprovalOutcome, RejectionOutcome, ShopRepository, ShopRepositoryError,
};
#[cfg(test)]
pub use shop_service::MockShopService;
pub use shop_service::ShopService;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use task_service::MockTaskService;
pub use task_service::TaskService;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use upload_service::MockUploadService;
pub use upload_service::UploadService;
#[cfg(test)]
pub use upload_store::MockUploadStore;
pub use upload_store::{UploadStore, UploadStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
