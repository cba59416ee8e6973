//! Ownership token generation

use crate::constants::LOCK_TOKEN_LENGTH;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Random token generation for lease ownership
pub struct TokenGenerator;

impl TokenGenerator {
    /// Generate a random alphanumeric token of `length` characters
    pub fn generate_alphanumeric(length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }

    /// Generate a lease ownership token
    pub fn generate_owner_token() -> String {
        Self::generate_alphanumeric(LOCK_TOKEN_LENGTH)
    }
}
