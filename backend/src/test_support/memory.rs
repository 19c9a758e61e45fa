//! In-memory implementations of the driven ports.
//!
//! Each adapter keeps the uniqueness and expiry rules of its PostgreSQL
//! counterpart so service and HTTP tests observe the same outcomes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CityRepository, CityRepositoryError, CredentialRepository, CredentialRepositoryError,
    SessionRecord, SessionRepository, SessionRepositoryError,
};
use crate::domain::{City, CityName, UserAccount, Username};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Account store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    accounts: Mutex<HashMap<String, UserAccount>>,
}

impl InMemoryCredentialRepository {
    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.accounts).len()
    }

    /// Whether no account has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored account for `username`.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<UserAccount> {
        lock(&self.accounts).get(username).cloned()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, CredentialRepositoryError> {
        Ok(self.get(username.as_ref()))
    }

    async fn exists(&self, username: &Username) -> Result<bool, CredentialRepositoryError> {
        Ok(lock(&self.accounts).contains_key(username.as_ref()))
    }

    async fn insert(&self, account: &UserAccount) -> Result<(), CredentialRepositoryError> {
        let mut accounts = lock(&self.accounts);
        let key = account.username().as_ref().to_owned();
        if accounts.contains_key(&key) {
            return Err(CredentialRepositoryError::duplicate(key));
        }
        accounts.insert(key, account.clone());
        Ok(())
    }
}

/// Read-only city table.
#[derive(Default)]
pub struct InMemoryCityRepository {
    cities: Vec<City>,
}

impl InMemoryCityRepository {
    /// Serve exactly `cities`.
    #[must_use]
    pub const fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Repository preloaded with [`reference_cities`].
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(reference_cities())
    }
}

#[async_trait]
impl CityRepository for InMemoryCityRepository {
    async fn find_by_name(&self, name: &CityName) -> Result<Option<City>, CityRepositoryError> {
        Ok(self
            .cities
            .iter()
            .filter(|city| city.name == name.as_ref())
            .min_by_key(|city| city.id)
            .cloned())
    }
}

/// Rows matching the seed migration.
#[must_use]
pub fn reference_cities() -> Vec<City> {
    [
        (1, "Kabul", "AFG", "Kabol", 1_780_000),
        (5, "Amsterdam", "NLD", "Noord-Holland", 731_200),
        (6, "Rotterdam", "NLD", "Zuid-Holland", 593_321),
        (456, "London", "GBR", "England", 7_285_000),
        (1532, "Tokyo", "JPN", "Tokyo-to", 7_980_230),
        (3793, "New York", "USA", "New York", 8_008_278),
    ]
    .into_iter()
    .map(|(id, name, country_code, district, population)| City {
        id,
        name: name.to_owned(),
        country_code: country_code.to_owned(),
        district: district.to_owned(),
        population,
    })
    .collect()
}

/// Session table backed by a `HashMap`.
#[derive(Default)]
pub struct InMemorySessionRepository {
    records: Mutex<HashMap<String, SessionRecord>>,
}

impl InMemorySessionRepository {
    /// Raw record lookup that ignores expiry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SessionRecord> {
        lock(&self.records).get(key).cloned()
    }

    /// Number of stored records, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Whether no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_live(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Ok(self.get(key).filter(|record| !record.is_expired(now)))
    }

    async fn insert(&self, record: &SessionRecord) -> Result<(), SessionRepositoryError> {
        let mut records = lock(&self.records);
        if records.contains_key(&record.key) {
            return Err(SessionRepositoryError::duplicate(record.key.as_str()));
        }
        records.insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &SessionRecord) -> Result<bool, SessionRepositoryError> {
        let mut records = lock(&self.records);
        match records.get_mut(&record.key) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_expiry(
        &self,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepositoryError> {
        if let Some(record) = lock(&self.records).get_mut(key) {
            record.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionRepositoryError> {
        lock(&self.records).remove(key);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        Ok((before - records.len()) as u64)
    }
}
