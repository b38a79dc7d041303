//! Hashing and verification of secrets

use crate::codec::{decode_with, HashFormat, StoredHash};
use crate::compare::constant_time_eq;
use crate::kdf::spawn_derive_key;
use crate::policy::current_year;
use crate::salt::generate_salt;
use crate::{DerivedKeyError, HashOptions, Result};

/// Hash `secret` into a canonical stored hash string
///
/// A fresh salt is drawn for every call, so hashing the same secret twice
/// never yields the same string.
///
/// # Errors
///
/// - [`DerivedKeyError::InvalidInput`] for an empty secret or unusable options
/// - [`DerivedKeyError::HashingFailed`] if salt generation or key derivation fails
pub async fn hash(secret: impl AsRef<[u8]>, options: &HashOptions) -> Result<String> {
    hash_at(secret.as_ref(), options, current_year()).await
}

/// [`hash`] with the policy default resolved against `year`
pub(crate) async fn hash_at(secret: &[u8], options: &HashOptions, year: i32) -> Result<String> {
    if secret.is_empty() {
        return Err(DerivedKeyError::invalid_input("secret must not be empty"));
    }
    options.validate()?;

    let iterations = options.resolved_iterations_at(year);
    tracing::debug!(
        iterations,
        algorithm = %options.algorithm,
        salt_size = options.salt_size,
        key_length = options.key_length,
        "hashing secret"
    );

    let salt = generate_salt(options.salt_size)
        .await
        .map_err(|e| DerivedKeyError::hashing_failed(e.to_string()))?;
    let key = spawn_derive_key(
        secret,
        &salt,
        iterations,
        options.key_length,
        options.algorithm,
    )
    .await
    .map_err(|e| DerivedKeyError::hashing_failed(e.to_string()))?;

    Ok(StoredHash::store(iterations, &*key, &*salt))
}

/// Check `secret` against a stored hash
///
/// The key is re-derived with the stored iteration count, the stored salt,
/// `options.algorithm`, and the stored key's length, then compared in
/// constant time. Returns `Ok(false)` for a wrong secret.
///
/// # Errors
///
/// - [`DerivedKeyError::MalformedHash`] if `stored` does not parse in `options.format`
/// - [`DerivedKeyError::VerificationFailed`] if key derivation fails
pub async fn verify(
    secret: impl AsRef<[u8]>,
    stored: &str,
    options: &HashOptions,
) -> Result<bool> {
    let decoded = decode_with(stored, options.format).inspect_err(|e| {
        tracing::warn!(error = %e, "stored hash failed to decode");
    })?;

    tracing::debug!(
        iterations = decoded.iterations(),
        algorithm = %options.algorithm,
        key_length = decoded.key().len(),
        "verifying secret"
    );

    let mut derived = spawn_derive_key(
        secret.as_ref(),
        decoded.salt(),
        decoded.iterations(),
        decoded.key().len(),
        options.algorithm,
    )
    .await
    .map_err(|e| DerivedKeyError::verification_failed(e.to_string()))?;

    if options.format.is_ascii_masked() {
        derived.iter_mut().for_each(|b| *b &= 0x7f);
    }

    Ok(constant_time_eq(&derived, decoded.key()))
}

/// Hasher bound to a fixed set of options
///
/// ```no_run
/// # async fn run() -> derived_key::Result<()> {
/// use derived_key::PasswordHasher;
///
/// let hasher = PasswordHasher::new().with_iterations(100_000);
/// let stored = hasher.hash("correct horse").await?;
/// assert!(hasher.verify("correct horse", &stored).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    options: HashOptions,
}

impl PasswordHasher {
    /// Hasher with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with the given options
    #[must_use]
    pub fn with_options(options: HashOptions) -> Self {
        Self { options }
    }

    /// Set an explicit iteration count
    #[must_use]
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.options = self.options.with_iterations(iterations);
        self
    }

    /// Set the PRF digest
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: crate::Algorithm) -> Self {
        self.options = self.options.with_algorithm(algorithm);
        self
    }

    /// Set the salt size in bytes
    #[must_use]
    pub fn with_salt_size(mut self, salt_size: usize) -> Self {
        self.options = self.options.with_salt_size(salt_size);
        self
    }

    /// Set the derived key length in bytes
    #[must_use]
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.options = self.options.with_key_length(key_length);
        self
    }

    /// Set the stored hash layout expected by `verify`
    #[must_use]
    pub fn with_format(mut self, format: HashFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &HashOptions {
        &self.options
    }

    /// See [`hash`]
    ///
    /// # Errors
    ///
    /// Same as [`hash`].
    pub async fn hash(&self, secret: impl AsRef<[u8]>) -> Result<String> {
        hash(secret, &self.options).await
    }

    /// See [`verify`]
    ///
    /// # Errors
    ///
    /// Same as [`verify`].
    pub async fn verify(&self, secret: impl AsRef<[u8]>, stored: &str) -> Result<bool> {
        verify(secret, stored, &self.options).await
    }

    /// Verify, and on success report whether the hash should be regenerated
    /// under the current options
    ///
    /// Returns `None` when the secret does not match.
    ///
    /// # Errors
    ///
    /// Same as [`verify`].
    pub async fn verify_and_check(
        &self,
        secret: impl AsRef<[u8]>,
        stored: &str,
    ) -> Result<Option<bool>> {
        if !self.verify(secret, stored).await? {
            return Ok(None);
        }
        let decoded = decode_with(stored, self.options.format)?;
        let outdated = self.options.format != HashFormat::Canonical
            || decoded.needs_rehash(&self.options);
        Ok(Some(outdated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_secret_is_invalid() {
        let err = hash("", &HashOptions::default().with_iterations(1))
            .await
            .expect_err("empty secret");
        assert!(matches!(err, DerivedKeyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn invalid_options_are_rejected_before_work() {
        let err = hash("secret", &HashOptions::default().with_iterations(0))
            .await
            .expect_err("zero iterations");
        assert!(matches!(err, DerivedKeyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn key_and_salt_sizes_follow_options() {
        let options = HashOptions::default()
            .with_iterations(10)
            .with_salt_size(24)
            .with_key_length(48);
        let stored = hash("secret", &options).await.expect("hash");
        let decoded: StoredHash = stored.parse().expect("decodes");
        assert_eq!(decoded.iterations(), 10);
        assert_eq!(decoded.salt().len(), 24);
        assert_eq!(decoded.key().len(), 48);
    }

    #[tokio::test]
    async fn verify_uses_stored_key_length() {
        let options = HashOptions::default()
            .with_iterations(10)
            .with_key_length(64);
        let stored = hash("secret", &options).await.expect("hash");
        let ok = verify("secret", &stored, &HashOptions::default().with_key_length(16))
            .await
            .expect("verify");
        assert!(ok);
    }

    #[tokio::test]
    async fn malformed_is_an_error_not_false() {
        let err = verify("secret", "not-a-hash", &HashOptions::default())
            .await
            .expect_err("malformed");
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn zero_stored_iterations_fail_verification() {
        let stored = StoredHash::store(0, [1u8; 32], [2u8; 16]);
        let err = verify("secret", &stored, &HashOptions::default())
            .await
            .expect_err("zero rounds");
        assert!(matches!(err, DerivedKeyError::VerificationFailed(_)));
        let message = err.to_string();
        assert!(message.starts_with("Error verifying hash"), "{message}");
        assert!(!message.contains("hashing"), "{message}");
    }

    #[tokio::test]
    async fn unset_iterations_embed_policy_count() {
        let options = HashOptions::default();
        assert_eq!(options.iterations, None);

        for (year, expected) in [(2000, 1000), (2002, 2000)] {
            let stored = hash_at(b"secret", &options, year).await.expect("hash");
            let decoded: StoredHash = stored.parse().expect("decodes");
            assert_eq!(decoded.iterations(), expected);
            assert!(verify("secret", &stored, &options).await.expect("verify"));
        }
    }

    #[tokio::test]
    async fn verify_and_check_flags_weak_hashes() {
        let weak = hash("secret", &HashOptions::default().with_iterations(10))
            .await
            .expect("hash");
        let hasher = PasswordHasher::new().with_iterations(20);
        assert_eq!(hasher.verify_and_check("secret", &weak).await.ok(), Some(Some(true)));
        assert_eq!(hasher.verify_and_check("Secret", &weak).await.ok(), Some(None));

        let current = hasher.hash("secret").await.expect("hash");
        assert_eq!(
            hasher.verify_and_check("secret", &current).await.ok(),
            Some(Some(false))
        );
    }
}
