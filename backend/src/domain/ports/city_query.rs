//! Driving port for reference-data lookups.

use async_trait::async_trait;

use crate::domain::{City, CityName, Error};

/// City lookups as seen by the HTTP layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityQuery: Send + Sync {
    /// Fetch a city by exact name, or fail with
    /// [`ErrorCode::NotFound`](crate::domain::ErrorCode::NotFound).
    async fn city_by_name(&self, name: &CityName) -> Result<City, Error>;
}
