use std::time::{Duration, Instant};

// Used when `started_at + timeout` is not representable. Far beyond any real benchmark.
const FARTHEST_DEADLINE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Measures elapsed wall-clock time of a single dispatch run using the monotonic clock.
///
/// # Examples
///
/// ```
/// use prime_scaling::Stopwatch;
///
/// let stopwatch = Stopwatch::start();
/// std::thread::sleep(std::time::Duration::from_millis(5));
///
/// assert!(stopwatch.elapsed_millis() >= 5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started_at: Instant,
}

impl Stopwatch {
    /// Starts measuring from the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch was started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Whole milliseconds elapsed since the stopwatch was started, saturating at `u64::MAX`.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        saturating_millis(self.elapsed())
    }

    /// The instant at which `timeout` measured from the start of the stopwatch expires.
    ///
    /// Timeouts too large to represent are clamped to a deadline roughly a century away.
    ///
    /// # Panics
    ///
    /// Panics if even the clamped deadline cannot be represented by the platform clock.
    #[must_use]
    pub fn deadline_after(&self, timeout: Duration) -> Instant {
        self.started_at
            .checked_add(timeout)
            .or_else(|| self.started_at.checked_add(FARTHEST_DEADLINE))
            .expect("the platform clock must represent instants a century in the future")
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
