use std::ops::RangeInclusive;

use derive_more::Display;

use crate::{Error, Result};

/// An inclusive range of positive integers whose primes are to be counted.
///
/// The bounds are validated on construction, so every candidate in the range is a valid
/// input for [`is_prime()`][crate::is_prime].
///
/// # Examples
///
/// ```
/// use prime_scaling::CandidateRange;
///
/// let range = CandidateRange::new(2, 100)?;
/// assert_eq!(range.len(), 99);
/// # Ok::<(), prime_scaling::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{start}..={end}")]
pub struct CandidateRange {
    start: i64,
    end: i64,
}

impl CandidateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `start` is less than 1 or `end` is less than `start`.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start < 1 || end < start {
            return Err(Error::InvalidRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// The first candidate in the range.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The last candidate in the range.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of candidates in the range. Never zero.
    #[must_use]
    #[expect(
        clippy::len_without_is_empty,
        reason = "a validated range always contains at least one candidate"
    )]
    pub fn len(&self) -> u64 {
        self.end.abs_diff(self.start).saturating_add(1)
    }

    /// Iterates over the candidates in ascending order.
    pub fn candidates(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}
