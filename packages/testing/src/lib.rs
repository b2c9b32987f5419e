#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for tests and benchmarks of the prime scaling packages.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long a test wrapped in [`with_watchdog()`] may run. Dispatch tests spin up real
/// worker groups, so this is generous compared to a pure unit test.
pub const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs a test on a separate thread and fails it if it does not finish within
/// [`WATCHDOG_TIMEOUT`].
///
/// A deadlocked worker group would otherwise hang the whole test binary.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled
/// and the test runs directly, so that mutation testing can detect hanging mutations itself.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode) and re-raises
/// any panic of the test itself.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let primes = with_watchdog(|| testing::count_primes_up_to(100));
/// assert_eq!(primes, 25);
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this fails, the receiver has already given up on us.
        drop(tx.send(result));
    });

    match rx.recv_timeout(WATCHDOG_TIMEOUT) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded the {WATCHDOG_TIMEOUT:?} watchdog timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}

/// Counts the primes in `2..=limit` with a sieve of Eratosthenes.
///
/// Independent of the trial division under test, so it can serve as an oracle.
#[must_use]
pub fn count_primes_up_to(limit: usize) -> u64 {
    if limit < 2 {
        return 0;
    }

    let mut composite = vec![false; limit + 1];
    let mut count = 0;

    for n in 2..=limit {
        if composite[n] {
            continue;
        }

        count += 1;

        let mut multiple = n * n;
        while multiple <= limit {
            composite[multiple] = true;
            multiple += n;
        }
    }

    count
}

/// Calculates the difference between two f64 values and considers
/// them equal if the difference is not more than `close_enough`.
///
/// This is a "correctly performed" floating point equality comparison.
#[must_use]
pub fn f64_diff_abs(a: f64, b: f64, close_enough: f64) -> f64 {
    let diff = (a - b).abs();

    if diff <= close_enough { 0.0 } else { diff }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn watchdog_returns_value() {
        assert_eq!(with_watchdog(|| 42), 42);
    }

    #[test]
    fn sieve_matches_known_counts() {
        assert_eq!(count_primes_up_to(0), 0);
        assert_eq!(count_primes_up_to(1), 0);
        assert_eq!(count_primes_up_to(2), 1);
        assert_eq!(count_primes_up_to(100), 25);
        assert_eq!(count_primes_up_to(1000), 168);
        assert_eq!(count_primes_up_to(5_000_000), 348_513);
    }

    #[test]
    fn diff_within_tolerance_is_zero() {
        assert_eq!(f64_diff_abs(1.0, 1.000_000_1, 0.001), 0.0);
        assert!(f64_diff_abs(1.0, 2.0, 0.001) > 0.5);
    }
}
