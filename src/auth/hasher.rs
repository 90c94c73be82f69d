// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-way hashing of secrets.
//!
//! The same capability hashes local passwords and refresh tokens (a refresh
//! token is the hash of its access token's id). Each use gets its own
//! instance so the refresh cost stays low when the password cost is raised.

use super::error::AuthError;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// One-way hash + verify capability.
pub trait Hasher: Send + Sync {
    /// Hash a secret. The result is salted, so hashing twice differs.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Check a secret against a stored hash.
    ///
    /// A mismatch and a malformed hash both return `false`.
    fn verify(&self, secret: &str, hashed: &str) -> bool;
}

/// bcrypt-backed [`Hasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the given cost.
    ///
    /// A cost of 0 selects bcrypt's default; other values are clamped to
    /// the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        let cost = if cost == 0 {
            bcrypt::DEFAULT_COST
        } else {
            cost.clamp(MIN_COST, MAX_COST)
        };
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Hasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        bcrypt::hash(secret, self.cost).map_err(|e| AuthError::Hash(format!("bcrypt hash: {e}")))
    }

    fn verify(&self, secret: &str, hashed: &str) -> bool {
        bcrypt::verify(secret, hashed).unwrap_or(false)
    }
}
