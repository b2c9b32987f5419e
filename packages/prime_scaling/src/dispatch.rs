use std::num::NonZero;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use new_zealand::nz;
use tracing::info;

use crate::pool::{Interrupted, WorkerGroup};
use crate::stopwatch::saturating_millis;
use crate::{CandidateRange, Error, Result, Stopwatch, is_prime};

/// How long a single dispatch run may take before it is abandoned.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How many candidates may wait in the queue per worker before submission blocks.
pub const DEFAULT_QUEUE_CAPACITY_PER_WORKER: NonZero<usize> = nz!(4096);

/// Upper bound on the total queue capacity of a dispatch run, whatever the per-worker
/// capacity and worker count. The queue allocates every slot up front.
pub const MAX_QUEUE_CAPACITY: NonZero<usize> = nz!(1_048_576);

/// Result of counting primes over a range with a fixed number of workers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DispatchOutcome {
    prime_count: u64,
    elapsed: Duration,
}

impl DispatchOutcome {
    /// How many primes the range contains.
    #[must_use]
    pub fn prime_count(&self) -> u64 {
        self.prime_count
    }

    /// Wall-clock time from starting submission until the last unit completed.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// [`elapsed()`][Self::elapsed] in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        saturating_millis(self.elapsed)
    }
}

/// Counts the primes in a range by testing every candidate as an independent unit of work
/// on a freshly created group of worker threads.
///
/// Each call creates its own worker group and prime counter and tears both down before
/// returning, so consecutive dispatch runs never share state.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use prime_scaling::{CandidateRange, Dispatcher};
///
/// let dispatcher = Dispatcher::default();
/// let outcome = dispatcher.dispatch(CandidateRange::new(2, 100)?, nz!(2))?;
///
/// assert_eq!(outcome.prime_count(), 25);
/// # Ok::<(), prime_scaling::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Dispatcher {
    timeout: Duration,
    queue_capacity_per_worker: NonZero<usize>,
}

impl Dispatcher {
    /// Creates a dispatcher that abandons any run taking longer than `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            queue_capacity_per_worker: DEFAULT_QUEUE_CAPACITY_PER_WORKER,
        }
    }

    /// Sets how many candidates may be queued per worker before submission blocks.
    ///
    /// The total capacity of a run is capped at [`MAX_QUEUE_CAPACITY`].
    #[must_use]
    pub fn with_queue_capacity_per_worker(mut self, capacity: NonZero<usize>) -> Self {
        self.queue_capacity_per_worker = capacity;
        self
    }

    /// The time limit applied to each dispatch run.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Counts the primes in `range` using `worker_count` parallel workers.
    ///
    /// The call blocks until every candidate has been tested or the timeout expires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ComputationTimeout`] if the run does not complete in time and
    /// [`Error::WorkerPanicked`] if a unit of work panics. In both cases no count is returned.
    pub fn dispatch(
        &self,
        range: CandidateRange,
        worker_count: NonZero<usize>,
    ) -> Result<DispatchOutcome> {
        info!(
            "Finding primes from {} to {} using {} core(s).",
            range.start(),
            range.end(),
            worker_count
        );

        let prime_count = Arc::new(AtomicU64::new(0));
        let mut group = WorkerGroup::spawn(worker_count, self.queue_capacity(worker_count));

        let stopwatch = Stopwatch::start();
        let deadline = stopwatch.deadline_after(self.timeout);

        for candidate in range.candidates() {
            let prime_count = Arc::clone(&prime_count);

            group
                .submit_before(
                    Box::new(move || {
                        if is_prime(candidate)? {
                            prime_count.fetch_add(1, Ordering::Relaxed);
                        }

                        Ok(())
                    }),
                    deadline,
                )
                .map_err(|interrupted| self.to_error(interrupted, worker_count))?;
        }

        group.close();
        group
            .wait_until(deadline)
            .map_err(|interrupted| self.to_error(interrupted, worker_count))?;

        let elapsed = stopwatch.elapsed();

        // Joining the workers also publishes every increment they made.
        drop(group);

        let outcome = DispatchOutcome {
            prime_count: prime_count.load(Ordering::Relaxed),
            elapsed,
        };

        info!(
            "Found {} primes in {} ms.",
            outcome.prime_count,
            outcome.elapsed_millis()
        );

        Ok(outcome)
    }

    fn queue_capacity(&self, worker_count: NonZero<usize>) -> NonZero<usize> {
        self.queue_capacity_per_worker
            .saturating_mul(worker_count)
            .min(MAX_QUEUE_CAPACITY)
    }

    fn to_error(&self, interrupted: Interrupted, worker_count: NonZero<usize>) -> Error {
        match interrupted {
            Interrupted::DeadlineElapsed => Error::ComputationTimeout {
                worker_count,
                timeout: self.timeout,
            },
            Interrupted::Failed(error) => error,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DISPATCH_TIMEOUT)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn count_is_independent_of_worker_count() {
        let range = CandidateRange::new(2, 100).unwrap();
        let dispatcher = Dispatcher::default();

        for worker_count in [nz!(1), nz!(2), nz!(4), nz!(8)] {
            let outcome = dispatcher.dispatch(range, worker_count).unwrap();

            assert_eq!(outcome.prime_count(), 25, "with {worker_count} workers");
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn range_starting_at_one_excludes_one() {
        let dispatcher = Dispatcher::default();

        let outcome = dispatcher
            .dispatch(CandidateRange::new(1, 10).unwrap(), nz!(3))
            .unwrap();

        assert_eq!(outcome.prime_count(), 4);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn single_candidate_range() {
        let dispatcher = Dispatcher::default();

        let prime = dispatcher
            .dispatch(CandidateRange::new(7919, 7919).unwrap(), nz!(2))
            .unwrap();
        let composite = dispatcher
            .dispatch(CandidateRange::new(7921, 7921).unwrap(), nz!(2))
            .unwrap();

        assert_eq!(prime.prime_count(), 1);
        assert_eq!(composite.prime_count(), 0);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn tiny_queue_still_counts_everything() {
        let dispatcher = Dispatcher::default().with_queue_capacity_per_worker(nz!(1));

        let outcome = dispatcher
            .dispatch(CandidateRange::new(2, 1000).unwrap(), nz!(4))
            .unwrap();

        assert_eq!(outcome.prime_count(), 168);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn zero_timeout_fails() {
        let dispatcher = Dispatcher::new(Duration::ZERO);

        let result = dispatcher.dispatch(CandidateRange::new(2, 100).unwrap(), nz!(2));

        assert!(matches!(
            result,
            Err(Error::ComputationTimeout { worker_count, timeout })
                if worker_count.get() == 2 && timeout == Duration::ZERO
        ));
    }

    #[test]
    fn queue_capacity_scales_with_workers() {
        let dispatcher = Dispatcher::default().with_queue_capacity_per_worker(nz!(10));

        assert_eq!(dispatcher.queue_capacity(nz!(3)).get(), 30);
    }

    #[test]
    fn queue_capacity_is_capped() {
        let dispatcher =
            Dispatcher::default().with_queue_capacity_per_worker(NonZero::new(usize::MAX / 4).unwrap());

        assert_eq!(dispatcher.queue_capacity(nz!(1)), MAX_QUEUE_CAPACITY);
        assert_eq!(dispatcher.queue_capacity(nz!(8)), MAX_QUEUE_CAPACITY);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn huge_queue_capacity_still_dispatches() {
        let dispatcher = Dispatcher::default()
            .with_queue_capacity_per_worker(NonZero::new(usize::MAX / 4).unwrap());

        let outcome = dispatcher
            .dispatch(CandidateRange::new(2, 100).unwrap(), nz!(1))
            .unwrap();

        assert_eq!(outcome.prime_count(), 25);
    }

    #[test]
    fn elapsed_millis_truncates() {
        let outcome = DispatchOutcome {
            prime_count: 0,
            elapsed: Duration::from_micros(2_999),
        };

        assert_eq!(outcome.elapsed_millis(), 2);
    }
}
