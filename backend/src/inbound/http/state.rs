//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminService, AuthService, CredentialHasher, FeedService, HealthRecordRepository,
    HealthRecordService, PetRepository, PetService, PostRepository, ProfileService,
    ShopRepository, ShopService, TaskRepository, TaskService, TokenIssuer, UploadService,
    UploadStore, UserRepository,
};
use crate::domain::{
    AdminServiceImpl, AuthServiceImpl, Email, FeedServiceImpl, HealthRecordServiceImpl,
    PetServiceImpl, ProfileServiceImpl, ShopServiceImpl, TaskServiceImpl, UploadServiceImpl,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use pawprint::inbound::http::state::HttpState;
///
/// fn register(state: HttpState) -> web::Data<HttpState> {
///     web::Data::new(state)
/// }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub profiles: Arc<dyn ProfileService>,
    pub pets: Arc<dyn PetService>,
    pub records: Arc<dyn HealthRecordService>,
    pub feed: Arc<dyn FeedService>,
    pub shops: Arc<dyn ShopService>,
    pub tasks: Arc<dyn TaskService>,
    pub admin: Arc<dyn AdminService>,
    pub uploads: Arc<dyn UploadService>,
}

/// Repository adapters the services are assembled from.
#[derive(Clone)]
pub struct Repositories<U, P, H, Po, S, T> {
    pub users: Arc<U>,
    pub pets: Arc<P>,
    pub records: Arc<H>,
    pub posts: Arc<Po>,
    pub shops: Arc<S>,
    pub tasks: Arc<T>,
}

impl<R> Repositories<R, R, R, R, R, R> {
    /// Use one adapter for every repository port.
    pub fn shared(store: Arc<R>) -> Self {
        Self {
            users: Arc::clone(&store),
            pets: Arc::clone(&store),
            records: Arc::clone(&store),
            posts: Arc::clone(&store),
            shops: Arc::clone(&store),
            tasks: store,
        }
    }
}

/// Non-repository collaborators of the services.
#[derive(Clone)]
pub struct ServiceSupport {
    pub hasher: Arc<dyn CredentialHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub clock: Arc<dyn Clock>,
    pub uploads: Arc<dyn UploadStore>,
    pub upload_max_bytes: u64,
    pub bootstrap_admin: Option<Email>,
}

impl HttpState {
    /// Wire every domain service over the given adapters.
    pub fn assemble<U, P, H, Po, S, T>(
        repositories: Repositories<U, P, H, Po, S, T>,
        support: ServiceSupport,
    ) -> Self
    where
        U: UserRepository + 'static,
        P: PetRepository + 'static,
        H: HealthRecordRepository + 'static,
        Po: PostRepository + 'static,
        S: ShopRepository + 'static,
        T: TaskRepository + 'static,
    {
        let Repositories {
            users,
            pets,
            records,
            posts,
            shops,
            tasks,
        } = repositories;
        let ServiceSupport {
            hasher,
            tokens,
            clock,
            uploads,
            upload_max_bytes,
            bootstrap_admin,
        } = support;

        Self {
            auth: Arc::new(
                AuthServiceImpl::new(Arc::clone(&users), hasher, tokens, Arc::clone(&clock))
                    .with_bootstrap_admin(bootstrap_admin),
            ),
            profiles: Arc::new(ProfileServiceImpl::new(
                Arc::clone(&users),
                Arc::clone(&pets),
                Arc::clone(&clock),
            )),
            pets: Arc::new(PetServiceImpl::new(Arc::clone(&pets), Arc::clone(&clock))),
            records: Arc::new(HealthRecordServiceImpl::new(
                Arc::clone(&pets),
                records,
                Arc::clone(&clock),
            )),
            feed: Arc::new(FeedServiceImpl::new(
                Arc::clone(&posts),
                Arc::clone(&pets),
                Arc::clone(&clock),
            )),
            shops: Arc::new(ShopServiceImpl::new(Arc::clone(&shops), Arc::clone(&clock))),
            tasks: Arc::new(TaskServiceImpl::new(tasks, pets, Arc::clone(&clock))),
            admin: Arc::new(AdminServiceImpl::new(users, posts, shops, clock)),
            uploads: Arc::new(UploadServiceImpl::new(uploads, upload_max_bytes)),
        }
    }
}
