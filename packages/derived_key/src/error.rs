//! Error handling for hashing and verification

use std::fmt;
use thiserror::Error;

/// Stored-hash field names, used when reporting which field failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Hex iteration count
    Iterations,
    /// Encoded derived key
    Key,
    /// Encoded salt
    Salt,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iterations => f.write_str("iterations"),
            Self::Key => f.write_str("key"),
            Self::Salt => f.write_str("salt"),
        }
    }
}

/// Why a stored hash could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Wrong number of delimited fields
    FieldCount {
        /// Fields required by the format
        expected: usize,
        /// Fields present in the input
        actual: usize,
    },
    /// Iteration field is empty, not hexadecimal, or out of range
    Iterations,
    /// A field contains characters outside its alphabet
    Encoding(Field),
    /// A field decoded to zero bytes where content is required
    Empty(Field),
    /// Input is shorter than the layout requires
    Truncated,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { expected, actual } => {
                write!(f, "expected {expected} fields, found {actual}")
            }
            Self::Iterations => f.write_str("iteration count is not a valid hex integer"),
            Self::Encoding(field) => write!(f, "{field} field is not valid base64url"),
            Self::Empty(field) => write!(f, "{field} field is empty"),
            Self::Truncated => f.write_str("input is too short"),
        }
    }
}

/// Hashing and verification errors
///
/// None of the messages carry secret, salt, or key material.
#[derive(Debug, Error)]
pub enum DerivedKeyError {
    /// Caller supplied an empty secret or an unusable option
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Salt generation or key derivation failed while hashing
    #[error("Error hashing secret: {0}")]
    HashingFailed(String),

    /// Stored hash does not parse
    #[error("Malformed stored hash: {0}")]
    MalformedHash(MalformedReason),

    /// Key derivation failed while verifying
    #[error("Error verifying hash: {0}")]
    VerificationFailed(String),

    /// Secure random source could not supply bytes
    #[error("Random number generation failed: {0}")]
    RandomGeneration(String),

    /// Derivation worker went away without a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DerivedKeyError {
    /// Create an `InvalidInput` error
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a `HashingFailed` error
    #[must_use]
    pub fn hashing_failed(msg: impl Into<String>) -> Self {
        Self::HashingFailed(msg.into())
    }

    /// Create a `VerificationFailed` error
    #[must_use]
    pub fn verification_failed(msg: impl Into<String>) -> Self {
        Self::VerificationFailed(msg.into())
    }

    /// Create an `Internal` error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a `MalformedHash` error
    #[must_use]
    pub fn malformed(reason: MalformedReason) -> Self {
        Self::MalformedHash(reason)
    }

    /// Whether this error came from a stored hash that failed to parse
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedHash(_))
    }
}

/// Result type for hashing operations
pub type Result<T> = std::result::Result<T, DerivedKeyError>;
