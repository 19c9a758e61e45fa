//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod city_query;
mod city_repository;
mod credential_repository;
mod login_service;
mod password_hasher;
mod session_repository;
mod signup_service;

pub use city_query::CityQuery;
#[cfg(test)]
pub use city_query::MockCityQuery;
pub use city_repository::{CityRepository, CityRepositoryError};
#[cfg(test)]
pub use city_repository::MockCityRepository;
pub use credential_repository::{CredentialRepository, CredentialRepositoryError};
#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRecord, SessionRepository, SessionRepositoryError};
#[cfg(test)]
pub use signup_service::MockSignupService;
pub use signup_service::SignupService;
