//! Stored hash serialization
//!
//! Canonical layout: `<iterations:hex>.<key:base64url>.<salt:base64url>`,
//! unpadded URL-safe base64 so that `.` never appears inside a field.
//!
//! Older releases wrote `<iterations:hex><delimiter><key><salt>` with key and
//! salt rendered as 7-bit ASCII and no separator between them. Those hashes
//! are still readable through [`HashFormat::Concatenated`], but only when the
//! caller asks for that format explicitly.

use crate::error::{Field, MalformedReason};
use crate::options::HashOptions;
use crate::policy::MAX_ITERATIONS;
use crate::{DerivedKeyError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Field delimiter of the canonical layout
pub const DELIMITER: char = '.';

/// Radix of the iteration field
pub const ITERATION_RADIX: u32 = 16;

/// Salt length, in characters, of concatenated legacy hashes
pub const LEGACY_SALT_LEN: usize = 16;

/// Layout of a stored hash string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HashFormat {
    /// `<hex>.<base64url key>.<base64url salt>`
    #[default]
    Canonical,
    /// `<hex><delimiter><ascii key><ascii salt>`, salt being the trailing
    /// [`LEGACY_SALT_LEN`] characters. Releases used both `.` and `|`.
    Concatenated {
        /// Separator between iteration count and key
        delimiter: char,
    },
}

impl HashFormat {
    /// Whether key bytes in this layout were truncated to 7 bits
    #[must_use]
    pub fn is_ascii_masked(self) -> bool {
        matches!(self, Self::Concatenated { .. })
    }
}

/// Decoded stored hash: iteration count, derived key, and salt
#[derive(Clone)]
pub struct StoredHash {
    iterations: u64,
    key: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
}

impl StoredHash {
    /// Assemble a stored hash from its parts
    #[must_use]
    pub fn new(iterations: u64, key: Vec<u8>, salt: Vec<u8>) -> Self {
        Self {
            iterations,
            key: Zeroizing::new(key),
            salt,
        }
    }

    /// Encode arbitrary key and salt bytes in the canonical layout
    #[must_use]
    pub fn store(iterations: u64, key: impl AsRef<[u8]>, salt: impl AsRef<[u8]>) -> String {
        encode(iterations, key.as_ref(), salt.as_ref())
    }

    /// PBKDF2 iteration count
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Derived key bytes
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Salt bytes
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Whether this hash is weaker than `options` would now produce
    ///
    /// True when it used fewer iterations than `options` resolve to, or a
    /// different key length.
    #[must_use]
    pub fn needs_rehash(&self, options: &HashOptions) -> bool {
        self.iterations < options.resolved_iterations() || self.key.len() != options.key_length
    }

    /// Canonical string form
    #[must_use]
    pub fn encode(&self) -> String {
        encode(self.iterations, &self.key, &self.salt)
    }
}

impl fmt::Debug for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredHash")
            .field("iterations", &self.iterations)
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

impl fmt::Display for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for StoredHash {
    type Err = DerivedKeyError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

/// Encode `(iterations, key, salt)` in the canonical layout
#[must_use]
pub fn encode(iterations: u64, key: &[u8], salt: &[u8]) -> String {
    format!(
        "{iterations:x}{DELIMITER}{}{DELIMITER}{}",
        URL_SAFE_NO_PAD.encode(key),
        URL_SAFE_NO_PAD.encode(salt)
    )
}

/// Decode a canonical stored hash
///
/// # Errors
///
/// Returns [`DerivedKeyError::MalformedHash`] on a wrong field count, a bad
/// iteration field, an invalid base64url character, or an empty key.
pub fn decode(stored: &str) -> Result<StoredHash> {
    decode_with(stored, HashFormat::Canonical)
}

/// Decode a stored hash written in `format`
///
/// # Errors
///
/// Returns [`DerivedKeyError::MalformedHash`] when `stored` does not match
/// the layout of `format`.
pub fn decode_with(stored: &str, format: HashFormat) -> Result<StoredHash> {
    match format {
        HashFormat::Canonical => decode_canonical(stored),
        HashFormat::Concatenated { delimiter } => decode_concatenated(stored, delimiter),
    }
}

fn decode_canonical(stored: &str) -> Result<StoredHash> {
    let fields: Vec<&str> = stored.split(DELIMITER).collect();
    let [iterations, key, salt] = fields.as_slice() else {
        return Err(DerivedKeyError::malformed(MalformedReason::FieldCount {
            expected: 3,
            actual: fields.len(),
        }));
    };

    let iterations = parse_iterations(iterations)?;
    let key = decode_field(key, Field::Key)?;
    if key.is_empty() {
        return Err(DerivedKeyError::malformed(MalformedReason::Empty(Field::Key)));
    }
    let salt = decode_field(salt, Field::Salt)?;

    Ok(StoredHash {
        iterations,
        key,
        salt: salt.to_vec(),
    })
}

fn decode_concatenated(stored: &str, delimiter: char) -> Result<StoredHash> {
    let Some((iterations, rest)) = stored.split_once(delimiter) else {
        return Err(DerivedKeyError::malformed(MalformedReason::FieldCount {
            expected: 2,
            actual: 1,
        }));
    };

    let iterations = parse_iterations(iterations)?;
    if !rest.is_ascii() {
        return Err(DerivedKeyError::malformed(MalformedReason::Encoding(Field::Key)));
    }
    if rest.len() <= LEGACY_SALT_LEN {
        return Err(DerivedKeyError::malformed(MalformedReason::Truncated));
    }

    let (key, salt) = rest.as_bytes().split_at(rest.len() - LEGACY_SALT_LEN);
    Ok(StoredHash::new(iterations, key.to_vec(), salt.to_vec()))
}

fn parse_iterations(field: &str) -> Result<u64> {
    let malformed = || DerivedKeyError::malformed(MalformedReason::Iterations);

    // from_str_radix tolerates a leading sign
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let iterations = u64::from_str_radix(field, ITERATION_RADIX).map_err(|_| malformed())?;
    if iterations > MAX_ITERATIONS {
        return Err(malformed());
    }
    Ok(iterations)
}

fn decode_field(field: &str, which: Field) -> Result<Zeroizing<Vec<u8>>> {
    URL_SAFE_NO_PAD
        .decode(field)
        .map(Zeroizing::new)
        .map_err(|_| DerivedKeyError::malformed(MalformedReason::Encoding(which)))
}
