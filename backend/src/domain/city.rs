//! City reference data.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the read-only city reference table.
///
/// Serialised camelCase:
///
/// ```json
/// {"id": 5, "name": "Amsterdam", "countryCode": "NLD",
///  "district": "Noord-Holland", "population": 731200}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Primary key.
    #[schema(example = 5)]
    pub id: i32,
    /// Name as stored; lookups match it exactly.
    #[schema(example = "Amsterdam")]
    pub name: String,
    /// ISO 3166-1 alpha-3 code.
    #[schema(example = "NLD")]
    pub country_code: String,
    /// Administrative district.
    #[schema(example = "Noord-Holland")]
    pub district: String,
    /// Head count.
    #[schema(example = 731200)]
    pub population: i32,
}

/// Validation error for [`CityName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("city name must not be empty")]
pub struct EmptyCityNameError;

/// Exact name used for a city lookup.
///
/// Matching is exact: no trimming or case folding is applied, so
/// `"amsterdam"` does not find `"Amsterdam"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    /// Wrap a lookup key.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCityNameError`] for an empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, EmptyCityNameError> {
        let owned = name.into();
        if owned.is_empty() {
            return Err(EmptyCityNameError);
        }
        Ok(Self(owned))
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
