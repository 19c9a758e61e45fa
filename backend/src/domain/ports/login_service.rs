//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing credential store or
//! hash algorithm, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Username};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the authenticated username.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`ErrorCode::Forbidden`](crate::domain::ErrorCode::Forbidden) with the
    /// same message.
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<Username, Error>;
}
