//! City reference-data service implementing the [`CityQuery`] driving port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CityQuery, CityRepository, CityRepositoryError};
use crate::domain::{City, CityName, Error};

fn map_repository_error(error: CityRepositoryError) -> Error {
    match error {
        CityRepositoryError::Connection { message } => {
            Error::internal(format!("city store unavailable: {message}"))
        }
        CityRepositoryError::Query { message } => {
            Error::internal(format!("city store error: {message}"))
        }
    }
}

/// [`CityQuery`] backed by a [`CityRepository`].
///
/// Storage failures surface as redacted internal errors.
#[derive(Clone)]
pub struct CityLookupService<R> {
    cities: Arc<R>,
}

impl<R> CityLookupService<R> {
    /// Serve lookups from `cities`.
    #[must_use]
    pub const fn new(cities: Arc<R>) -> Self {
        Self { cities }
    }
}

#[async_trait]
impl<R> CityQuery for CityLookupService<R>
where
    R: CityRepository,
{
    async fn city_by_name(&self, name: &CityName) -> Result<City, Error> {
        self.cities
            .find_by_name(name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("city {name} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCityRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn rotterdam() -> City {
        City {
            id: 6,
            name: "Rotterdam".to_owned(),
            country_code: "NLD".to_owned(),
            district: "Zuid-Holland".to_owned(),
            population: 593_321,
        }
    }

    fn name(raw: &str) -> CityName {
        CityName::new(raw).expect("non-empty city name")
    }

    #[rstest]
    #[tokio::test]
    async fn returns_matching_city() {
        let mut repo = MockCityRepository::new();
        repo.expect_find_by_name()
            .with(eq(name("Rotterdam")))
            .times(1)
            .return_once(|_| Ok(Some(rotterdam())));

        let city = CityLookupService::new(Arc::new(repo))
            .city_by_name(&name("Rotterdam"))
            .await
            .expect("city found");
        assert_eq!(city, rotterdam());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_city_is_not_found() {
        let mut repo = MockCityRepository::new();
        repo.expect_find_by_name().times(1).return_once(|_| Ok(None));

        let err = CityLookupService::new(Arc::new(repo))
            .city_by_name(&name("Atlantis"))
            .await
            .expect_err("absent city fails");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(CityRepositoryError::connection("refused"))]
    #[case(CityRepositoryError::query("bad column"))]
    #[tokio::test]
    async fn storage_failures_are_internal(#[case] failure: CityRepositoryError) {
        let mut repo = MockCityRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(move |_| Err(failure));

        let err = CityLookupService::new(Arc::new(repo))
            .city_by_name(&name("Tokyo"))
            .await
            .expect_err("storage failure surfaces");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
