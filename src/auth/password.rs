//! Password Hashing
//! Mission: One-way credential storage with bcrypt

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(#[from] BcryptError);

/// Salted adaptive hashing with a cost fixed for the life of the process.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        Ok(hash(plaintext, self.cost)?)
    }

    /// `Ok(false)` on mismatch. A stored hash that does not parse is an error.
    pub fn verify(&self, hashed: &str, plaintext: &str) -> Result<bool, HashingError> {
        Ok(verify(plaintext, hashed)?)
    }
}

/// Cheapest cost bcrypt accepts; keeps test hashing fast.
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;
