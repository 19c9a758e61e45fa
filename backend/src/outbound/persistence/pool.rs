//! Shared PostgreSQL connection pool.
//!
//! The credential, city and session repositories all check connections out of
//! one [`DbPool`], sized by `CITIES_POOL_MAX_SIZE`. Connection strings never
//! reach logs or error messages with their password intact.

use std::time::Duration;

use tracing::info;
use url::Url;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Cause reported by the pool.
        message: String,
    },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Redacted target and cause.
        message: String,
    },
}

impl PoolError {
    /// Build [`PoolError::Checkout`].
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Build [`PoolError::Build`].
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing and connection settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cities_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://cities@localhost/cities")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.database_url(), "postgres://cities@localhost/cities");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: 10 connections, 2 kept idle, 30 second checkout timeout.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Cap the pool at `max_size` (at least one) connections, lowering the
    /// idle floor to match.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self.min_idle = self.min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// Connections kept open while idle, capped at the pool size.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// How long a checkout waits for a free connection.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection string as configured. Never log this; use
    /// [`PoolConfig::redacted_url`].
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// The connection string safe for logs: passwords in the userinfo or
    /// query become `***`, and strings that do not parse as URLs are replaced
    /// by a placeholder.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        redact_connection_string(&self.database_url)
    }
}

const REDACTED: &str = "***";
const UNPARSED_CONNECTION_STRING: &str = "<unparsed connection string>";
const SECRET_QUERY_KEYS: [&str; 2] = ["password", "sslpassword"];

fn is_secret_key(key: &str) -> bool {
    SECRET_QUERY_KEYS
        .iter()
        .any(|secret| key.eq_ignore_ascii_case(secret))
}

/// Key/value DSNs and anything else `Url` rejects are withheld entirely.
fn redact_connection_string(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return UNPARSED_CONNECTION_STRING.to_owned();
    };
    if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
        return UNPARSED_CONNECTION_STRING.to_owned();
    }
    if url.query_pairs().any(|(key, _)| is_secret_key(&key)) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if is_secret_key(&key) {
                    REDACTED.to_owned()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.into()
}

/// Shared async connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool, opening `min_idle` connections eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the database
    /// cannot be reached.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| {
                PoolError::build(format!("{} ({err})", config.redacted_url()))
            })?;

        info!(
            url = %config.redacted_url(),
            max_size = config.max_size,
            "database pool ready"
        );
        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the timeout elapses first.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
