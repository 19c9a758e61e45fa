//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use cities_backend::inbound::http::session_config::SessionSettings;
use cities_backend::outbound::password::BcryptPasswordHasher;
use cities_backend::outbound::persistence::DbPool;

const DEFAULT_SESSION_TTL_DAYS: i64 = 14;
const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) hasher: BcryptPasswordHasher,
    pub(crate) session_ttl: CookieDuration,
    pub(crate) purge_interval: Duration,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            hasher: BcryptPasswordHasher::default(),
            session_ttl: CookieDuration::days(DEFAULT_SESSION_TTL_DAYS),
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }

    /// Replace the password hasher, e.g. to change the bcrypt cost.
    #[must_use]
    pub fn with_hasher(mut self, hasher: BcryptPasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Lifetime of a session, applied to both the cookie and stored record.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: CookieDuration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Interval between purges of expired session records.
    #[must_use]
    pub fn with_purge_interval(mut self, interval: Duration) -> Self {
        self.purge_interval = interval;
        self
    }
}
