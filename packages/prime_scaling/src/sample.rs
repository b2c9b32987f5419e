use std::num::NonZero;

/// Timing of one dispatch run, recorded by the benchmark runner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimingSample {
    worker_count: NonZero<usize>,
    prime_count: u64,
    elapsed_millis: u64,
}

impl TimingSample {
    /// Creates a sample for a run with `worker_count` workers that found `prime_count` primes
    /// in `elapsed_millis` milliseconds.
    #[must_use]
    pub fn new(worker_count: NonZero<usize>, prime_count: u64, elapsed_millis: u64) -> Self {
        Self {
            worker_count,
            prime_count,
            elapsed_millis,
        }
    }

    /// The degree of parallelism the run used.
    #[must_use]
    pub fn worker_count(&self) -> NonZero<usize> {
        self.worker_count
    }

    /// How many primes the run found.
    #[must_use]
    pub fn prime_count(&self) -> u64 {
        self.prime_count
    }

    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }
}
