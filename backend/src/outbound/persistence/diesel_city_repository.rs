//! PostgreSQL-backed [`CityRepository`] over the seeded `city` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CityRepository, CityRepositoryError};
use crate::domain::{City, CityName};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::CityRow;
use super::pool::DbPool;
use super::schema::city;

/// Diesel-backed city lookups.
#[derive(Clone)]
pub struct DieselCityRepository {
    pool: DbPool,
}

impl DieselCityRepository {
    /// Query cities through `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CityRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CityRepositoryError::connection(message),
        DieselFailure::Query(message) => CityRepositoryError::query(message),
        DieselFailure::UniqueViolation => CityRepositoryError::query("unexpected unique violation"),
    }
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            country_code: row.country_code,
            district: row.district,
            population: row.population,
        }
    }
}

#[async_trait]
impl CityRepository for DieselCityRepository {
    async fn find_by_name(&self, name: &CityName) -> Result<Option<City>, CityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CityRepositoryError::connection(pool_error_message(err)))?;

        let row: Option<CityRow> = city::table
            .filter(city::name.eq(name.as_ref()))
            .order(city::id.asc())
            .select(CityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(City::from))
    }
}
