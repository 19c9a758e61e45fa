//! Account domain service.
//!
//! Implements the signup and login driving ports over the credential store and
//! password hasher driven ports. Hashing and verification are CPU bound, so
//! they run on Tokio's blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialRepository, CredentialRepositoryError, LoginService, PasswordHasher,
    PasswordHasherError, SignupService,
};
use crate::domain::{Error, HashedPassword, LoginCredentials, TraceId, UserAccount, Username};

/// Message shared by every credential mismatch so callers cannot tell which
/// usernames exist.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";

fn map_repository_error(error: CredentialRepositoryError) -> Error {
    match error {
        CredentialRepositoryError::Duplicate { username } => {
            Error::conflict(format!("username {username} is already registered"))
        }
        CredentialRepositoryError::Connection { message } => {
            Error::internal(format!("credential store unavailable: {message}"))
        }
        CredentialRepositoryError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Signup and login orchestration.
#[derive(Clone)]
pub struct AccountService<R, H> {
    credentials: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H> {
    /// Create a new service over a credential store and hasher.
    pub fn new(credentials: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            credentials,
            hasher,
        }
    }
}

impl<R, H> AccountService<R, H>
where
    H: PasswordHasher + 'static,
{
    async fn run_hasher<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHasherError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        TraceId::spawn_blocking(move || op(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }
}

#[async_trait]
impl<R, H> SignupService for AccountService<R, H>
where
    R: CredentialRepository,
    H: PasswordHasher + 'static,
{
    async fn sign_up(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let hashed: HashedPassword = self.run_hasher(move |h| h.hash(&password)).await?;

        let username = credentials.username();
        if self
            .credentials
            .exists(username)
            .await
            .map_err(map_repository_error)?
        {
            info!(%username, "signup rejected: username taken");
            return Err(map_repository_error(CredentialRepositoryError::duplicate(
                username.as_ref(),
            )));
        }

        let account = UserAccount::new(username.clone(), hashed);
        self.credentials
            .insert(&account)
            .await
            .map_err(map_repository_error)?;
        info!(%username, "account registered");
        Ok(())
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: CredentialRepository,
    H: PasswordHasher + 'static,
{
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<Username, Error> {
        let username = credentials.username();
        let Some(account) = self
            .credentials
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
        else {
            warn!(%username, "login rejected: unknown username");
            return Err(Error::forbidden(INVALID_CREDENTIALS_MESSAGE));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = account.hashed_password().clone();
        let matches = self
            .run_hasher(move |h| h.verify(&password, &stored))
            .await?;

        if matches {
            info!(%username, "login succeeded");
            Ok(account.username().clone())
        } else {
            warn!(%username, "login rejected: password mismatch");
            Err(Error::forbidden(INVALID_CREDENTIALS_MESSAGE))
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
