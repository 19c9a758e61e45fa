//! Stored account model.

use std::fmt;

use crate::domain::Username;

/// Salted password hash in bcrypt's modular crypt format.
///
/// The value is opaque to the domain; only a
/// [`PasswordHasher`](crate::domain::ports::PasswordHasher) interprets it.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash produced by a hasher or loaded from storage.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Hashes stay out of logs even at debug level.
impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Registered account as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    username: Username,
    hashed_password: HashedPassword,
}

impl UserAccount {
    /// Pair a username with its stored hash.
    #[must_use]
    pub const fn new(username: Username, hashed_password: HashedPassword) -> Self {
        Self {
            username,
            hashed_password,
        }
    }

    /// Account name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// bcrypt hash of the account password.
    #[must_use]
    pub const fn hashed_password(&self) -> &HashedPassword {
        &self.hashed_password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_hash() {
        let hash = HashedPassword::new("$2b$04$abcdefghijklmnopqrstuv");
        assert_eq!(format!("{hash:?}"), "HashedPassword(..)");
    }
}
