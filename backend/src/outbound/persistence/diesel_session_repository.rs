//! PostgreSQL-backed [`SessionRepository`] over the `sessions` table.
//!
//! Session state is stored as a JSONB object of string values. Expiry is
//! enforced in the lookup predicate, so lapsed rows are invisible even before
//! the reaper deletes them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SessionRecord, SessionRepository, SessionRepositoryError};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewSessionRow, SessionRow, SessionUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::sessions;

/// Diesel-backed session records.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    /// Store sessions through `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SessionRepositoryError {
    SessionRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, key: &str) -> SessionRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => SessionRepositoryError::duplicate(key),
        DieselFailure::Connection(message) => SessionRepositoryError::connection(message),
        DieselFailure::Query(message) => SessionRepositoryError::query(message),
    }
}

fn encode_state(record: &SessionRecord) -> Result<serde_json::Value, SessionRepositoryError> {
    serde_json::to_value(&record.state)
        .map_err(|err| SessionRepositoryError::corrupt(record.key.as_str(), err.to_string()))
}

fn row_to_record(row: SessionRow) -> Result<SessionRecord, SessionRepositoryError> {
    let state: HashMap<String, String> = serde_json::from_value(row.state)
        .map_err(|err| SessionRepositoryError::corrupt(row.id.as_str(), err.to_string()))?;
    Ok(SessionRecord {
        key: row.id,
        state,
        expires_at: row.expires_at,
    })
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn find_live(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SessionRow> = sessions::table
            .filter(sessions::id.eq(key))
            .filter(sessions::expires_at.gt(now))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, key))?;

        row.map(row_to_record).transpose()
    }

    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError> {
        let state = encode_state(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewSessionRow {
            id: record.key.as_str(),
            state: &state,
            expires_at: record.expires_at,
        };
        diesel::insert_into(sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &record.key))
    }

    async fn update(&self, record: &SessionRecord) -> Result<bool, SessionRepositoryError> {
        let state = encode_state(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = SessionUpdate {
            state: &state,
            expires_at: record.expires_at,
        };
        let updated = diesel::update(sessions::table.find(record.key.as_str()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &record.key))?;

        Ok(updated > 0)
    }

    async fn update_expiry(
        &self,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(sessions::table.find(key))
            .set(sessions::expires_at.eq(expires_at))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, key))
    }

    async fn delete(&self, key: &str) -> Result<(), SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(sessions::table.find(key))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, key))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "*"))?;

        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
