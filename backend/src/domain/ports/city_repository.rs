//! Driven port for the city reference table.
use async_trait::async_trait;

use crate::domain::{City, CityName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by city repositories.
    pub enum CityRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "city store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "city store query failed: {message}",
    }
}

/// Read access to the city table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Exact-match lookup. When several rows share a name the lowest id wins.
    async fn find_by_name(&self, name: &CityName) -> Result<Option<City>, CityRepositoryError>;
}
