//! Test utilities for the backend crate.
//!
//! In-memory adapters for every driven port plus a settable clock. Unit tests
//! use them directly; integration tests reach them through the
//! `test-support` feature.

mod clock;
mod memory;

pub use clock::MutableClock;
pub use memory::{
    InMemoryCityRepository, InMemoryCredentialRepository, InMemorySessionRepository,
    reference_cities,
};
