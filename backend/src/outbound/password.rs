//! bcrypt adapter for the [`PasswordHasher`] port.

use crate::domain::HashedPassword;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

pub use bcrypt::DEFAULT_COST;

/// Work factors accepted by bcrypt.
pub const COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Salted bcrypt hashing at a fixed work factor.
///
/// # Examples
/// ```
/// use cities_backend::domain::ports::PasswordHasher;
/// use cities_backend::outbound::password::BcryptPasswordHasher;
///
/// let hasher = BcryptPasswordHasher::new(4).expect("cost in range");
/// let hash = hasher.hash("pw1").expect("hashes");
/// assert!(hasher.verify("pw1", &hash).expect("verifies"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Build a hasher, rejecting costs bcrypt cannot honour.
    pub fn new(cost: u32) -> Result<Self, PasswordHasherError> {
        if !COST_RANGE.contains(&cost) {
            return Err(PasswordHasherError::hash(format!(
                "bcrypt cost {cost} outside {}..={}",
                COST_RANGE.start(),
                COST_RANGE.end()
            )));
        }
        Ok(Self { cost })
    }

    /// Work factor used for new hashes.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<HashedPassword, PasswordHasherError> {
        bcrypt::hash(password, self.cost)
            .map(HashedPassword::new)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, PasswordHasherError> {
        bcrypt::verify(password, hash.as_str())
            .map_err(|err| PasswordHasherError::verify(err.to_string()))
    }
}
