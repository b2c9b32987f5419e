use std::num::NonZero;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while counting primes or summarizing benchmark results.
///
/// None of these are retried. Each one aborts the benchmark run it occurs in.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The primality test was asked about a number that is zero or negative.
    #[error("cannot test primality of {value}: only positive numbers are supported")]
    InvalidArgument {
        /// The rejected input.
        value: i64,
    },

    /// A candidate range was requested that does not start at a positive number
    /// or that ends before it starts.
    #[error("invalid candidate range {start}..={end}: start must be >= 1 and end must be >= start")]
    InvalidRange {
        /// Requested first candidate.
        start: i64,

        /// Requested last candidate.
        end: i64,
    },

    /// A dispatch run did not finish within its time limit. No partial result exists.
    #[error("prime counting with {worker_count} worker(s) did not finish within {timeout:?}")]
    ComputationTimeout {
        /// The worker count of the run that timed out.
        worker_count: NonZero<usize>,

        /// The time limit that was exceeded.
        timeout: Duration,
    },

    /// A unit of work panicked, leaving the prime count of the run undefined.
    #[error("a unit of work panicked during prime counting with {worker_count} worker(s)")]
    WorkerPanicked {
        /// The worker count of the run that was aborted.
        worker_count: NonZero<usize>,
    },

    /// The trimmed average needs at least three samples: one minimum and one maximum
    /// are discarded and at least one sample must remain to be averaged.
    #[error("a trimmed average needs at least 3 timing samples but {available} were provided")]
    InsufficientSamples {
        /// How many samples were provided.
        available: usize,
    },
}

/// A specialized `Result` type for prime scaling operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
