//! Builders wiring PostgreSQL adapters into domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use cities_backend::domain::{AccountService, CityLookupService};
use cities_backend::inbound::http::state::HttpState;
use cities_backend::outbound::password::BcryptPasswordHasher;
use cities_backend::outbound::persistence::{
    DbPool, DieselCityRepository, DieselCredentialRepository, DieselSessionRepository,
};
use cities_backend::outbound::session::RepositorySessionStore;

/// Build handler state backed by the database pool.
pub(crate) fn build_http_state(pool: &DbPool, hasher: BcryptPasswordHasher) -> web::Data<HttpState> {
    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselCredentialRepository::new(pool.clone())),
        Arc::new(hasher),
    ));
    let cities = Arc::new(CityLookupService::new(Arc::new(DieselCityRepository::new(
        pool.clone(),
    ))));
    web::Data::new(HttpState::new(accounts.clone(), accounts, cities))
}

/// Build the session store and hand back its repository for the reaper.
pub(crate) fn build_session_store(
    pool: &DbPool,
    clock: Arc<dyn Clock>,
) -> (
    RepositorySessionStore<DieselSessionRepository>,
    Arc<DieselSessionRepository>,
) {
    let repository = Arc::new(DieselSessionRepository::new(pool.clone()));
    (
        RepositorySessionStore::new(Arc::clone(&repository), clock),
        repository,
    )
}
