//! Builders selecting the repository adapters behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use pawprint::inbound::http::state::{HttpState, Repositories, ServiceSupport};
use pawprint::outbound::memory::MemoryStore;
use pawprint::outbound::persistence::{
    DbPool, DieselHealthRecordRepository, DieselPetRepository, DieselPostRepository,
    DieselShopRepository, DieselTaskRepository, DieselUserRepository,
};

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselPetRepository,
    DieselHealthRecordRepository,
    DieselPostRepository,
    DieselShopRepository,
    DieselTaskRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        pets: Arc::new(DieselPetRepository::new(pool.clone())),
        records: Arc::new(DieselHealthRecordRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        shops: Arc::new(DieselShopRepository::new(pool.clone())),
        tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
    }
}

/// Assemble the services over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(super) fn build_http_state(
    db_pool: Option<&DbPool>,
    support: ServiceSupport,
) -> web::Data<HttpState> {
    let state = match db_pool {
        Some(pool) => HttpState::assemble(diesel_repositories(pool), support),
        None => {
            warn!("no database configured; data lives in memory and is lost on restart");
            HttpState::assemble(Repositories::shared(Arc::new(MemoryStore::new())), support)
        }
    };
    web::Data::new(state)
}
