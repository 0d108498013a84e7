//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository translates between Diesel rows (`models.rs`) and domain
//! types. Row structs and the schema stay private to this module. Multi-table
//! deletes share the helpers in `diesel_cascades` and always run inside one
//! transaction.
//!
//! # Example
//!
//! ```ignore
//! use pawprint::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pawprint")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_cascades;
mod diesel_health_record_repository;
mod diesel_pet_repository;
mod diesel_post_repository;
mod diesel_shop_repository;
mod diesel_task_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_health_record_repository::DieselHealthRecordRepository;
pub use diesel_pet_repository::DieselPetRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_shop_repository::DieselShopRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
