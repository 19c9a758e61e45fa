//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities and use-cases independent of HTTP
//! and persistence. Inbound adapters depend on the driving ports declared in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `Username`/`LoginCredentials`: validated authentication inputs.
//! - `HashedPassword`/`UserAccount`: stored account model.
//! - `City`/`CityName`: reference data and its lookup key.
//! - `AccountService`/`CityLookupService`: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod city;
pub mod city_lookup;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{CredentialsValidationError, LoginCredentials, Username};
pub use self::city::{City, CityName, EmptyCityNameError};
pub use self::city_lookup::CityLookupService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{HashedPassword, UserAccount};
