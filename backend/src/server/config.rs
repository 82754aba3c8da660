//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use experience_backend::inbound::http::session_config::SessionSettings;
use experience_backend::outbound::persistence::DbPool;
use experience_backend::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) settings: AppSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, settings: AppSettings) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            settings,
        }
    }

    /// Attach a database connection pool. Without one the server runs on
    /// the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
