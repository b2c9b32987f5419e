use std::num::NonZero;
use std::time::Duration;

use new_zealand::nz;

use crate::{
    CandidateRange, DEFAULT_DISPATCH_TIMEOUT, DEFAULT_QUEUE_CAPACITY_PER_WORKER, Dispatcher,
};

/// First candidate tested by the default benchmark.
pub const DEFAULT_RANGE_START: i64 = 2;

/// Last candidate tested by the default benchmark.
pub const DEFAULT_RANGE_END: i64 = 5_000_000;

/// Highest worker count tried by the default benchmark.
pub const DEFAULT_MAX_WORKER_COUNT: NonZero<usize> = nz!(8);

/// Parameters of a benchmark run.
///
/// Use [`BenchmarkConfig::builder()`] to override individual values. The defaults count the
/// primes up to five million with 1 to 8 workers, allowing each run five minutes.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use prime_scaling::{BenchmarkConfig, CandidateRange};
///
/// let config = BenchmarkConfig::builder()
///     .range(CandidateRange::new(2, 1000)?)
///     .max_worker_count(nz!(4))
///     .build();
///
/// assert_eq!(config.max_worker_count().get(), 4);
/// # Ok::<(), prime_scaling::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BenchmarkConfig {
    range: CandidateRange,
    max_worker_count: NonZero<usize>,
    dispatch_timeout: Duration,
    queue_capacity_per_worker: NonZero<usize>,
}

impl BenchmarkConfig {
    /// Creates a builder starting from the default configuration.
    #[must_use]
    pub fn builder() -> BenchmarkConfigBuilder {
        BenchmarkConfigBuilder::new()
    }

    /// The candidates whose primes are counted in every run.
    #[must_use]
    pub fn range(&self) -> CandidateRange {
        self.range
    }

    /// Runs are made with every worker count from 1 up to and including this value.
    #[must_use]
    pub fn max_worker_count(&self) -> NonZero<usize> {
        self.max_worker_count
    }

    /// Time limit of each individual run.
    #[must_use]
    pub fn dispatch_timeout(&self) -> Duration {
        self.dispatch_timeout
    }

    /// A dispatcher configured with this timeout and queue capacity.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.dispatch_timeout)
            .with_queue_capacity_per_worker(self.queue_capacity_per_worker)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for configuring a [`BenchmarkConfig`].
#[derive(Debug)]
pub struct BenchmarkConfigBuilder {
    range: Option<CandidateRange>,
    max_worker_count: NonZero<usize>,
    dispatch_timeout: Duration,
    queue_capacity_per_worker: NonZero<usize>,
}

impl BenchmarkConfigBuilder {
    fn new() -> Self {
        Self {
            range: None,
            max_worker_count: DEFAULT_MAX_WORKER_COUNT,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            queue_capacity_per_worker: DEFAULT_QUEUE_CAPACITY_PER_WORKER,
        }
    }

    /// Sets the candidates to count primes in.
    ///
    /// Default is `2..=5_000_000`.
    #[must_use]
    pub fn range(mut self, range: CandidateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Sets the highest worker count to try.
    ///
    /// Default is 8.
    #[must_use]
    pub fn max_worker_count(mut self, count: NonZero<usize>) -> Self {
        self.max_worker_count = count;
        self
    }

    /// Sets the time limit of each run.
    ///
    /// Default is 5 minutes.
    #[must_use]
    pub fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Sets how many candidates may be queued per worker before submission blocks.
    ///
    /// Default is 4096. The total capacity of a run is capped at
    /// [`MAX_QUEUE_CAPACITY`][crate::MAX_QUEUE_CAPACITY].
    #[must_use]
    pub fn queue_capacity_per_worker(mut self, capacity: NonZero<usize>) -> Self {
        self.queue_capacity_per_worker = capacity;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> BenchmarkConfig {
        BenchmarkConfig {
            range: self.range.unwrap_or_else(default_range),
            max_worker_count: self.max_worker_count,
            dispatch_timeout: self.dispatch_timeout,
            queue_capacity_per_worker: self.queue_capacity_per_worker,
        }
    }
}

fn default_range() -> CandidateRange {
    CandidateRange::new(DEFAULT_RANGE_START, DEFAULT_RANGE_END)
        .expect("default range constants form a valid range")
}
