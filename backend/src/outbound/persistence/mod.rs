//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here implement the domain's driven ports over a shared `bb8`
//! pool of `diesel-async` connections. They only translate between Diesel row
//! structs (`models.rs`, `schema.rs`, both private) and domain types, and map
//! every database failure onto the port's typed error.
//!
//! # Example
//!
//! ```ignore
//! use cities_backend::outbound::persistence::{DbPool, DieselCityRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cities")).await?;
//! let cities = DieselCityRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_city_repository;
mod diesel_credential_repository;
mod diesel_session_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_city_repository::DieselCityRepository;
pub use diesel_credential_repository::DieselCredentialRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
