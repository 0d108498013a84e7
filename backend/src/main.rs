//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pawprint::inbound::http::health::HealthState;
use pawprint::inbound::http::state::ServiceSupport;
use pawprint::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pawprint::outbound::security::{Argon2CredentialHasher, JwtTokenIssuer};
use pawprint::outbound::storage::CapStdUploadStore;
use pawprint::settings::{BuildMode, Settings, secret_fingerprint, settings_from_env};
use server::{ServerConfig, create_server};

/// Apply pending migrations and open the connection pool.
async fn connect_database(database_url: &str, max_size: u32) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(count = applied.len(), migrations = ?applied, "database migrations applied");

    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(io::Error::other)
}

fn service_support(settings: &Settings) -> io::Result<ServiceSupport> {
    let uploads = CapStdUploadStore::open(&settings.upload_dir)?;
    Ok(ServiceSupport {
        hasher: Arc::new(Argon2CredentialHasher),
        tokens: Arc::new(JwtTokenIssuer::new(
            settings.jwt_secret.as_bytes(),
            settings.jwt_ttl,
        )),
        clock: Arc::new(DefaultClock),
        uploads: Arc::new(uploads),
        upload_max_bytes: settings.upload_max_bytes,
        bootstrap_admin: settings.bootstrap_admin.clone(),
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        bind_addr = %settings.bind_addr,
        upload_dir = %settings.upload_dir.display(),
        jwt_fingerprint = %secret_fingerprint(settings.jwt_secret.as_bytes()),
        "settings loaded"
    );

    let support = service_support(&settings)?;
    let mut config = ServerConfig::new(
        settings.bind_addr,
        settings.allowed_origins.clone(),
        support,
    );
    if let Some(url) = settings.database_url.as_deref() {
        let pool = connect_database(url, settings.db_pool_max_size).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr, "listening");
    server.await
}
