//! Constant-time byte comparison

use std::hint::black_box;
use subtle::ConstantTimeEq;

/// Compare two byte strings without leaking where they first differ
///
/// The loop always runs `a.len()` times. When the lengths differ, `a` is
/// compared against itself and the length mismatch alone decides the
/// result, so running time depends only on `a.len()`.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let length_mismatch = u8::from(a.len() != b.len());
    let other = if length_mismatch == 0 { b } else { a };

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(other) {
        diff = black_box(diff | (x ^ y));
    }

    (diff | length_mismatch).ct_eq(&0).into()
}
