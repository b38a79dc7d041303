//! PBKDF2 password hashing with self-describing stored hashes
//!
//! `hash` turns a secret into `<iterations:hex>.<key>.<salt>` (both
//! base64url, unpadded); `verify` re-derives the key from a stored string and
//! compares it in constant time.
//!
//! ```no_run
//! # async fn run() -> derived_key::Result<()> {
//! use derived_key::{hash, verify, HashOptions};
//!
//! let options = HashOptions::default().with_iterations(1000);
//! let stored = hash("secret", &options).await?;
//! assert!(verify("secret", &stored, &options).await?);
//! assert!(!verify("Secret", &stored, &options).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod codec;
pub mod compare;
pub mod error;
pub mod hasher;
pub mod kdf;
pub mod options;
pub mod policy;
pub mod salt;

// Re-export error types
pub use error::{DerivedKeyError, Field, MalformedReason, Result};

pub use algorithm::Algorithm;
pub use codec::{decode, decode_with, encode, HashFormat, StoredHash};
pub use compare::constant_time_eq;
pub use hasher::{hash, verify, PasswordHasher};
pub use kdf::{derive_key, spawn_derive_key, PendingKey, PBKDF2_MAX_ROUNDS};
pub use options::HashOptions;
pub use policy::{current_year, default_iterations, iterations_for_year, MAX_ITERATIONS};
pub use salt::generate_salt;
