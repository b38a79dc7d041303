//! Hash and verify configuration

use crate::codec::HashFormat;
use crate::kdf::{KEY_LENGTH, PBKDF2_MAX_ROUNDS};
use crate::policy::{current_year, iterations_for_year};
use crate::salt::SALT_SIZE;
use crate::{Algorithm, DerivedKeyError, Result};
use serde::{Deserialize, Serialize};

/// Options for a single `hash` or `verify` call
///
/// `verify` reads only `algorithm` and `format`; iterations and key length
/// come from the stored hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashOptions {
    /// PBKDF2 iterations; `None` uses the policy value for the current year
    pub iterations: Option<u64>,
    /// PRF digest
    pub algorithm: Algorithm,
    /// Salt size in bytes
    pub salt_size: usize,
    /// Derived key size in bytes
    pub key_length: usize,
    /// Stored hash layout expected by `verify`
    pub format: HashFormat,
}

impl HashOptions {
    /// Options with the policy iteration count for `year`, clamped to what
    /// PBKDF2 accepts
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            iterations: Some(policy_rounds(year)),
            ..Self::default()
        }
    }

    /// Defaults of the earliest releases: HMAC-SHA1, 16-byte salt, 32-byte key
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            algorithm: Algorithm::Sha1,
            ..Self::default()
        }
    }

    /// Set an explicit iteration count
    #[must_use]
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the PRF digest
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the salt size in bytes
    #[must_use]
    pub fn with_salt_size(mut self, salt_size: usize) -> Self {
        self.salt_size = salt_size;
        self
    }

    /// Set the derived key length in bytes
    #[must_use]
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    /// Set the stored hash layout used by `verify`
    #[must_use]
    pub fn with_format(mut self, format: HashFormat) -> Self {
        self.format = format;
        self
    }

    /// Iteration count to hash with: the explicit value or the current policy
    ///
    /// The policy default is clamped to `1..=PBKDF2_MAX_ROUNDS`; explicit
    /// values are returned as given and checked by [`Self::validate`].
    #[must_use]
    pub fn resolved_iterations(&self) -> u64 {
        self.resolved_iterations_at(current_year())
    }

    pub(crate) fn resolved_iterations_at(&self, year: i32) -> u64 {
        self.iterations.unwrap_or_else(|| policy_rounds(year))
    }

    /// Check the options describe a derivation the primitive can run
    ///
    /// # Errors
    ///
    /// Returns [`DerivedKeyError::InvalidInput`] for explicit iterations of
    /// zero or above [`PBKDF2_MAX_ROUNDS`], or a zero key length.
    pub fn validate(&self) -> Result<()> {
        if let Some(iterations) = self.iterations {
            if iterations == 0 || iterations > PBKDF2_MAX_ROUNDS {
                return Err(DerivedKeyError::invalid_input(format!(
                    "iterations must be between 1 and {PBKDF2_MAX_ROUNDS}, got {iterations}"
                )));
            }
        }
        if self.key_length == 0 {
            return Err(DerivedKeyError::invalid_input("key length must be non-zero"));
        }
        Ok(())
    }
}

fn policy_rounds(year: i32) -> u64 {
    iterations_for_year(year).clamp(1, PBKDF2_MAX_ROUNDS)
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            iterations: None,
            algorithm: Algorithm::default(),
            salt_size: SALT_SIZE,
            key_length: KEY_LENGTH,
            format: HashFormat::default(),
        }
    }
}
