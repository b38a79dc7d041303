//! PBKDF2 pseudorandom function selection

use crate::{DerivedKeyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HMAC digest used as the PBKDF2 pseudorandom function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// HMAC-SHA1, the default of hashes written before SHA-256 was adopted
    Sha1,
    /// HMAC-SHA256
    #[default]
    Sha256,
    /// HMAC-SHA512
    Sha512,
    /// HMAC-SHA3-256
    Sha3_256,
    /// HMAC-SHA3-512
    Sha3_512,
}

impl Algorithm {
    /// Canonical lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_512 => "sha3-512",
        }
    }

    /// Digest output size in bytes
    #[must_use]
    pub fn output_size(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 | Self::Sha3_256 => 32,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = DerivedKeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            "sha3-256" | "sha3_256" => Ok(Self::Sha3_256),
            "sha3-512" | "sha3_512" => Ok(Self::Sha3_512),
            _ => Err(DerivedKeyError::invalid_input(format!(
                "unsupported digest algorithm: {s}"
            ))),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = DerivedKeyError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_names() {
        assert_eq!("sha1".parse::<Algorithm>().ok(), Some(Algorithm::Sha1));
        assert_eq!("SHA256".parse::<Algorithm>().ok(), Some(Algorithm::Sha256));
        assert_eq!("sha-512".parse::<Algorithm>().ok(), Some(Algorithm::Sha512));
        assert_eq!(
            "sha3-256".parse::<Algorithm>().ok(),
            Some(Algorithm::Sha3_256)
        );
    }

    #[test]
    fn rejects_unknown() {
        let err = "md5".parse::<Algorithm>().expect_err("md5 is not supported");
        assert!(matches!(err, DerivedKeyError::InvalidInput(_)));
    }

    #[test]
    fn display_round_trips() {
        for alg in [
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha512,
            Algorithm::Sha3_256,
            Algorithm::Sha3_512,
        ] {
            assert_eq!(alg.to_string().parse::<Algorithm>().ok(), Some(alg));
        }
    }
}
