//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use pawprint::inbound::http::state::ServiceSupport;
use pawprint::middleware::AllowedOrigins;
use pawprint::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: AllowedOrigins,
    pub(crate) support: ServiceSupport,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        allowed_origins: AllowedOrigins,
        support: ServiceSupport,
    ) -> Self {
        Self {
            bind_addr,
            allowed_origins,
            support,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, every repository port is served by its Diesel adapter
    /// instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
