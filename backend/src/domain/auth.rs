//! Authentication primitives: usernames and submitted credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Only presence is checked; length and character rules are left to storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Account identifier chosen by the user at signup.
///
/// ## Invariants
/// - Stored trimmed; never empty.
///
/// # Examples
/// ```
/// use cities_backend::domain::Username;
///
/// let name = Username::new("  alice ").expect("non-blank");
/// assert_eq!(name.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "alice")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CredentialsValidationError> {
        let normalized = raw.as_ref().trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = CredentialsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated credentials submitted to signup and login.
///
/// ## Invariants
/// - `username` satisfies the [`Username`] invariants.
/// - `password` is non-empty but retains caller-provided whitespace so the
///   stored hash always reflects exactly what was typed.
///
/// # Examples
/// ```
/// use cities_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "pw1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = Username::new(username)?;

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username: name,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for credential lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
