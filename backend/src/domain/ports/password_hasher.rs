//! Driven port for salted password hashing.
//!
//! Implementations are CPU bound and synchronous. Async callers move them onto
//! the blocking pool.

use crate::domain::HashedPassword;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Producing a hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be checked, e.g. it is malformed.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// One-way salted hashing with constant-time verification.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<HashedPassword, PasswordHasherError>;

    /// Check `password` against a previously produced `hash`.
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for hashes that cannot be
    /// evaluated.
    fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, PasswordHasherError>;
}
