//! Throwaway PostgreSQL databases for the Diesel adapter suites.
//!
//! Set `PAWPRINT_TEST_DATABASE_URL` to a server URL whose role may create
//! databases. Each [`TestDatabase`] creates a uniquely named database on that
//! server, applies the embedded migrations and drops the database again when
//! it goes out of scope. Without the variable the suites print a skip marker
//! and return early, so a plain `cargo test` still passes on machines with no
//! PostgreSQL.

use diesel::{Connection, PgConnection, RunQueryDsl};
use pawprint::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use url::Url;
use uuid::Uuid;

pub const DATABASE_URL_ENV: &str = "PAWPRINT_TEST_DATABASE_URL";

/// A migrated database that is dropped on drop.
pub struct TestDatabase {
    pool: DbPool,
    admin_url: String,
    name: String,
}

impl TestDatabase {
    /// Create and migrate a fresh database, or `None` when no server is
    /// configured.
    ///
    /// # Panics
    ///
    /// Panics when a server is configured but cannot be prepared, so broken
    /// CI databases are never mistaken for a skip.
    pub async fn provision() -> Option<Self> {
        let Ok(admin_url) = std::env::var(DATABASE_URL_ENV) else {
            eprintln!("SKIP-TEST-DATABASE: {DATABASE_URL_ENV} is not set");
            return None;
        };
        let name = format!("pawprint_test_{}", Uuid::new_v4().simple());
        let database_url = database_url(&admin_url, &name);

        let (setup_admin, setup_name, setup_url) =
            (admin_url.clone(), name.clone(), database_url.clone());
        tokio::task::spawn_blocking(move || {
            execute(&setup_admin, &format!("CREATE DATABASE \"{setup_name}\""));
            run_pending_migrations(&setup_url).expect("migrations apply");
        })
        .await
        .expect("database setup task");

        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(4))
            .await
            .expect("pool for the test database");
        Some(Self {
            pool,
            admin_url,
            name,
        })
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.name);
        if let Err(err) = try_execute(&self.admin_url, &statement) {
            eprintln!("failed to drop test database {}: {err}", self.name);
        }
    }
}

fn database_url(admin_url: &str, name: &str) -> String {
    let mut url = Url::parse(admin_url).expect("valid PostgreSQL URL");
    url.set_path(name);
    url.to_string()
}

fn try_execute(url: &str, statement: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| err.to_string())?;
    diesel::sql_query(statement)
        .execute(&mut conn)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn execute(url: &str, statement: &str) {
    if let Err(err) = try_execute(url, statement) {
        panic!("`{statement}` failed: {err}");
    }
}
