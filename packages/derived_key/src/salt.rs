//! Salt generation from the operating system CSPRNG

use crate::{DerivedKeyError, Result};
use rand::{rngs::OsRng, TryRngCore};
use zeroize::Zeroizing;

/// Default salt size in bytes
pub const SALT_SIZE: usize = 16;

/// Fill `len` bytes from the OS random source
///
/// # Errors
///
/// Returns [`DerivedKeyError::RandomGeneration`] if the OS source cannot
/// supply the requested bytes.
pub fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| DerivedKeyError::RandomGeneration(e.to_string()))?;
    Ok(bytes)
}

/// Generate a fresh salt of exactly `size` bytes
///
/// A `size` of zero yields an empty salt; it is accepted but offers no
/// protection against precomputation.
///
/// # Errors
///
/// Returns [`DerivedKeyError::RandomGeneration`] when the secure random
/// source is unavailable. This is not retryable.
pub async fn generate_salt(size: usize) -> Result<Zeroizing<Vec<u8>>> {
    tracing::trace!(size, "generating salt");
    random_bytes(size)
}
