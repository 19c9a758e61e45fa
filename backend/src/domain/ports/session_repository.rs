//! Driven port persisting server-side session records.
//!
//! The session cookie carries only an opaque key. Everything else lives in a
//! [`SessionRecord`] behind this port, which the HTTP session store adapter
//! drives.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by session repositories.
    pub enum SessionRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session store query failed: {message}",
        /// A record with the same key already exists.
        Duplicate { key: String } => "session key already in use: {key}",
        /// Stored state could not be decoded.
        Corrupt { key: String, message: String } => "session {key} is unreadable: {message}",
    }
}

/// Server-held session state addressed by an opaque key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Opaque key carried in the session cookie.
    pub key: String,
    /// Serialised session entries, keyed by entry name.
    pub state: HashMap<String, String>,
    /// Instant after which the record is ignored and may be purged.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the record has lapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Storage for [`SessionRecord`]s.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load the record for `key` if it exists and has not expired at `now`.
    async fn find_live(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError>;

    /// Insert a new record; collisions yield
    /// [`SessionRepositoryError::Duplicate`].
    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError>;

    /// Replace state and expiry of an existing record.
    ///
    /// Returns `false` when no record exists for the key.
    async fn update(&self, record: &SessionRecord) -> Result<bool, SessionRepositoryError>;

    /// Move the expiry of an existing record. Unknown keys are ignored.
    async fn update_expiry(
        &self,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepositoryError>;

    /// Remove a record. Unknown keys are ignored.
    async fn delete(&self, key: &str) -> Result<(), SessionRepositoryError>;

    /// Remove every record that expired at or before `now`, returning the count.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError>;
}
