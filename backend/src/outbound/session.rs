//! Server-side `actix-session` store over the [`SessionRepository`] port.
//!
//! The cookie carries only a random 64-character key; state lives in the
//! repository with an absolute expiry derived from the middleware's TTL and
//! the injected clock. Lapsed records are never loaded.

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, warn};

use crate::domain::ports::{SessionRecord, SessionRepository, SessionRepositoryError};

/// Length of generated session keys.
pub const SESSION_KEY_LENGTH: usize = 64;

const KEY_GENERATION_ATTEMPTS: usize = 3;

/// [`SessionStore`] implementation persisting through a repository.
pub struct RepositorySessionStore<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for RepositorySessionStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> RepositorySessionStore<R> {
    /// Persist sessions through `repository`, timing expiry with `clock`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn expiry(&self, ttl: &Duration) -> Result<DateTime<Utc>, anyhow::Error> {
        let delta = TimeDelta::try_seconds(ttl.whole_seconds())
            .ok_or_else(|| anyhow!("session ttl {ttl} is out of range"))?;
        self.clock
            .utc()
            .checked_add_signed(delta)
            .ok_or_else(|| anyhow!("session ttl {ttl} overflows the clock"))
    }
}

fn generate_session_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LENGTH)
        .map(char::from)
        .collect()
}

fn into_session_key(raw: String) -> Result<SessionKey, anyhow::Error> {
    SessionKey::try_from(raw).map_err(|err| anyhow!("generated session key rejected: {err}"))
}

impl<R> RepositorySessionStore<R>
where
    R: SessionRepository,
{
    async fn insert_fresh(
        &self,
        state: HashMap<String, String>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, SessionRepositoryError> {
        let mut record = SessionRecord {
            key: generate_session_key(),
            state,
            expires_at,
        };
        let mut attempt = 1;
        loop {
            match self.repository.insert(&record).await {
                Ok(()) => return Ok(record.key),
                Err(SessionRepositoryError::Duplicate { .. })
                    if attempt < KEY_GENERATION_ATTEMPTS =>
                {
                    warn!(attempt, "session key collision, regenerating");
                    record.key = generate_session_key();
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R> SessionStore for RepositorySessionStore<R>
where
    R: SessionRepository + 'static,
{
    async fn load(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<HashMap<String, String>>, LoadError> {
        let now = self.clock.utc();
        match self.repository.find_live(session_key.as_ref(), now).await {
            Ok(record) => Ok(record.map(|r| r.state)),
            Err(err @ SessionRepositoryError::Corrupt { .. }) => {
                Err(LoadError::Deserialization(anyhow::Error::new(err)))
            }
            Err(err) => Err(LoadError::Other(anyhow::Error::new(err))),
        }
    }

    async fn save(
        &self,
        session_state: HashMap<String, String>,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        let expires_at = self.expiry(ttl).map_err(SaveError::Other)?;
        let key = self
            .insert_fresh(session_state, expires_at)
            .await
            .map_err(|err| match err {
                SessionRepositoryError::Corrupt { .. } => {
                    SaveError::Serialization(anyhow::Error::new(err))
                }
                other => SaveError::Other(anyhow::Error::new(other)),
            })?;
        debug!("session created");
        into_session_key(key).map_err(SaveError::Other)
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: HashMap<String, String>,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        let expires_at = self.expiry(ttl).map_err(UpdateError::Other)?;
        let record = SessionRecord {
            key: session_key.as_ref().to_owned(),
            state: session_state,
            expires_at,
        };
        let map_err = |err: SessionRepositoryError| match err {
            SessionRepositoryError::Corrupt { .. } => {
                UpdateError::Serialization(anyhow::Error::new(err))
            }
            other => UpdateError::Other(anyhow::Error::new(other)),
        };

        if self.repository.update(&record).await.map_err(map_err)? {
            return Ok(session_key);
        }

        // The record vanished (purged or deleted) between load and write.
        debug!("session missing on update, issuing a fresh key");
        let key = self
            .insert_fresh(record.state, expires_at)
            .await
            .map_err(map_err)?;
        into_session_key(key).map_err(UpdateError::Other)
    }

    async fn update_ttl(
        &self,
        session_key: &SessionKey,
        ttl: &Duration,
    ) -> Result<(), anyhow::Error> {
        let expires_at = self.expiry(ttl)?;
        self.repository
            .update_expiry(session_key.as_ref(), expires_at)
            .await
            .map_err(anyhow::Error::new)
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        self.repository
            .delete(session_key.as_ref())
            .await
            .map_err(anyhow::Error::new)
    }
}
