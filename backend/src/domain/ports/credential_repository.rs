//! Driven port for the credential store holding registered accounts.
use async_trait::async_trait;

use crate::domain::{UserAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential store adapters.
    pub enum CredentialRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "credential store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "credential store query failed: {message}",
        /// An account with the same username already exists.
        Duplicate { username: String } => "username already registered: {username}",
    }
}

/// Account persistence keyed by username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the account registered under `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, CredentialRepositoryError>;

    /// Report whether `username` is already taken.
    async fn exists(&self, username: &Username) -> Result<bool, CredentialRepositoryError>;

    /// Insert a new account.
    ///
    /// Adapters must report a uniqueness violation as
    /// [`CredentialRepositoryError::Duplicate`] rather than overwriting.
    async fn insert(&self, account: &UserAccount) -> Result<(), CredentialRepositoryError>;
}
