//! PBKDF2 key derivation
//!
//! Derivation is CPU-bound and scales with the iteration count, so the async
//! entry point runs it on tokio's blocking pool and hands the key back over a
//! oneshot channel.

use crate::{Algorithm, DerivedKeyError, Result};
use pbkdf2::pbkdf2_hmac;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use zeroize::Zeroizing;

/// Default derived key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Largest iteration count the PBKDF2 primitive accepts (32-bit round counter)
pub const PBKDF2_MAX_ROUNDS: u64 = u32::MAX as u64;

/// Derive `key_length` bytes from `secret` with PBKDF2-HMAC-`algorithm`
///
/// # Errors
///
/// Returns [`DerivedKeyError::InvalidInput`] if `iterations` is zero or does
/// not fit the primitive's 32-bit round counter, or if `key_length` is zero.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    iterations: u64,
    key_length: usize,
    algorithm: Algorithm,
) -> Result<Zeroizing<Vec<u8>>> {
    let rounds = u32::try_from(iterations)
        .ok()
        .filter(|rounds| *rounds > 0)
        .ok_or_else(|| {
            DerivedKeyError::invalid_input(format!(
                "PBKDF2 iterations must be between 1 and {PBKDF2_MAX_ROUNDS}, got {iterations}"
            ))
        })?;
    if key_length == 0 {
        return Err(DerivedKeyError::invalid_input("derived key length must be non-zero"));
    }

    let mut output = Zeroizing::new(vec![0u8; key_length]);
    match algorithm {
        Algorithm::Sha1 => pbkdf2_hmac::<sha1::Sha1>(secret, salt, rounds, &mut output),
        Algorithm::Sha256 => pbkdf2_hmac::<sha2::Sha256>(secret, salt, rounds, &mut output),
        Algorithm::Sha512 => pbkdf2_hmac::<sha2::Sha512>(secret, salt, rounds, &mut output),
        Algorithm::Sha3_256 => pbkdf2_hmac::<sha3::Sha3_256>(secret, salt, rounds, &mut output),
        Algorithm::Sha3_512 => pbkdf2_hmac::<sha3::Sha3_512>(secret, salt, rounds, &mut output),
    }

    Ok(output)
}

/// Run [`derive_key`] on the blocking pool
///
/// Inputs are copied into zeroizing buffers owned by the worker. Dropping
/// the returned future abandons the result; the worker's buffers are wiped
/// when it finishes.
#[must_use]
pub fn spawn_derive_key(
    secret: &[u8],
    salt: &[u8],
    iterations: u64,
    key_length: usize,
    algorithm: Algorithm,
) -> PendingKey {
    let secret = Zeroizing::new(secret.to_vec());
    let salt = Zeroizing::new(salt.to_vec());
    let (tx, rx) = oneshot::channel();

    tokio::task::spawn_blocking(move || {
        let result = derive_key(&secret, &salt, iterations, key_length, algorithm);
        // Receiver gone means the caller gave up; the key is wiped on drop
        let _ = tx.send(result);
    });

    PendingKey::new(rx)
}

/// Future resolving to a key derived on the blocking pool
pub struct PendingKey {
    receiver: oneshot::Receiver<Result<Zeroizing<Vec<u8>>>>,
}

impl PendingKey {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<Zeroizing<Vec<u8>>>>) -> Self {
        Self { receiver }
    }

    /// A `PendingKey` that is already resolved
    #[must_use]
    pub fn ready(result: Result<Zeroizing<Vec<u8>>>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }
}

impl Future for PendingKey {
    type Output = Result<Zeroizing<Vec<u8>>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                tracing::warn!("key derivation task dropped before completing");
                Poll::Ready(Err(DerivedKeyError::internal("key derivation task dropped")))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
