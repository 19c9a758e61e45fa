//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `CITIES_*` environment variables or matching CLI flags.
//! Only the database URL is mandatory.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 11600;
const DEFAULT_SESSION_TTL_DAYS: i64 = 14;
const MAX_SESSION_TTL_DAYS: i64 = 3650;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3600;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("CITIES_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind host is not an IP address.
    #[error("invalid bind host '{host}': {source}")]
    InvalidHost {
        /// Value as configured.
        host: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The session lifetime is outside `1..=MAX_SESSION_TTL_DAYS`.
    #[error("session ttl must be between 1 and {max} days, got {0}", max = MAX_SESSION_TTL_DAYS)]
    InvalidSessionTtl(i64),
    /// A zero purge interval would spin.
    #[error("purge interval must be at least one second")]
    InvalidPurgeInterval,
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITIES")]
pub struct ServerSettings {
    /// Interface to bind, `0.0.0.0` when unset.
    pub host: Option<String>,
    /// TCP port, 11600 when unset.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// bcrypt work factor; `bcrypt::DEFAULT_COST` when unset.
    pub bcrypt_cost: Option<u32>,
    /// Session lifetime in days.
    pub session_ttl_days: Option<i64>,
    /// Seconds between expired-session purges.
    pub purge_interval_secs: Option<u64>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = match self.host.as_deref() {
            Some(raw) => raw.parse().map_err(|source| SettingsError::InvalidHost {
                host: raw.to_owned(),
                source,
            })?,
            None => DEFAULT_HOST,
        };
        Ok(SocketAddr::new(host, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    pub fn session_ttl(&self) -> Result<actix_web::cookie::time::Duration, SettingsError> {
        let days = self.session_ttl_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS);
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
            return Err(SettingsError::InvalidSessionTtl(days));
        }
        Ok(actix_web::cookie::time::Duration::days(days))
    }

    pub fn purge_interval(&self) -> Result<Duration, SettingsError> {
        match self.purge_interval_secs.unwrap_or(DEFAULT_PURGE_INTERVAL_SECS) {
            0 => Err(SettingsError::InvalidPurgeInterval),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
