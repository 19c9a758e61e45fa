//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Account registration as seen by the HTTP layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Register a new account.
    ///
    /// Fails with [`ErrorCode::Conflict`](crate::domain::ErrorCode::Conflict)
    /// when the username is taken. No record is written on any failure.
    async fn sign_up(&self, credentials: &LoginCredentials) -> Result<(), Error>;
}
