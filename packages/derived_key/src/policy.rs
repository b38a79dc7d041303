//! Year-based iteration count recommendation
//!
//! Starts at 1,000 iterations in 2000 and doubles every two years, tracking
//! the OWASP password storage guidance.

use chrono::{Datelike, Utc};

/// Largest iteration count the policy will recommend (`2^53 - 1`)
///
/// Counts stay exactly representable as an IEEE-754 double so stored hashes
/// remain interchangeable with hosts that only have floating point integers.
pub const MAX_ITERATIONS: u64 = (1 << 53) - 1;

/// Iterations recommended for the year 2000
pub const BASELINE_ITERATIONS: u64 = 1_000;

/// Year the baseline applies to
pub const BASELINE_YEAR: i32 = 2000;

/// Current calendar year (UTC)
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Recommended PBKDF2 iteration count for `year`
///
/// `floor(2^((year - 2000) / 2) * 1000)`, clamped to [`MAX_ITERATIONS`].
/// Pure and monotonically non-decreasing in `year`.
#[must_use]
pub fn iterations_for_year(year: i32) -> u64 {
    let exponent = (f64::from(year) - f64::from(BASELINE_YEAR)) / 2.0;
    let iterations = (exponent.exp2() * BASELINE_ITERATIONS as f64).floor();

    // MAX_ITERATIONS converts to f64 exactly
    if iterations >= MAX_ITERATIONS as f64 {
        MAX_ITERATIONS
    } else {
        iterations as u64
    }
}

/// Recommended iteration count for the current year
#[must_use]
pub fn default_iterations() -> u64 {
    iterations_for_year(current_year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_year() {
        assert_eq!(iterations_for_year(2000), 1000);
    }

    #[test]
    fn doubles_every_two_years() {
        assert_eq!(iterations_for_year(2002), 2000);
        assert_eq!(iterations_for_year(2004), 4000);
        assert_eq!(iterations_for_year(2015), 181_019);
    }

    #[test]
    fn before_baseline() {
        assert_eq!(iterations_for_year(0), 0);
        assert_eq!(iterations_for_year(1998), 500);
        assert!(iterations_for_year(1999) <= 1000);
        assert_eq!(iterations_for_year(i32::MIN), 0);
    }

    #[test]
    fn clamps_at_ceiling() {
        assert!(iterations_for_year(2086) < MAX_ITERATIONS);
        assert_eq!(iterations_for_year(2087), MAX_ITERATIONS);
        assert_eq!(iterations_for_year(2100), MAX_ITERATIONS);
        assert_eq!(iterations_for_year(i32::MAX), MAX_ITERATIONS);
    }

    #[test]
    fn monotonic() {
        let mut previous = 0;
        for year in 1900..2200 {
            let current = iterations_for_year(year);
            assert!(current >= previous, "dropped at {year}");
            previous = current;
        }
    }

    #[test]
    fn current_year_is_sane() {
        assert!(current_year() >= 2024);
        assert!(default_iterations() >= iterations_for_year(2024));
    }
}
