//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CityQuery, LoginService, SignupService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Registration for `POST /signup`.
    pub signup: Arc<dyn SignupService>,
    /// Reference data for `GET /cities/{cityName}`.
    pub cities: Arc<dyn CityQuery>,
}

impl HttpState {
    /// Construct state from the port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use cities_backend::domain::{AccountService, CityLookupService};
    /// use cities_backend::inbound::http::state::HttpState;
    /// use cities_backend::outbound::password::BcryptPasswordHasher;
    /// use cities_backend::test_support::{InMemoryCityRepository, InMemoryCredentialRepository};
    ///
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryCredentialRepository::default()),
    ///     Arc::new(BcryptPasswordHasher::default()),
    /// ));
    /// let cities = Arc::new(CityLookupService::new(Arc::new(
    ///     InMemoryCityRepository::default(),
    /// )));
    /// let state = HttpState::new(accounts.clone(), accounts, cities);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        signup: Arc<dyn SignupService>,
        cities: Arc<dyn CityQuery>,
    ) -> Self {
        Self {
            login,
            signup,
            cities,
        }
    }
}
