//! End-to-end tests running real worker groups.
//!
//! These are ignored under Miri because Miri does not support the thread counts involved
//! at any reasonable speed.

use std::time::Duration;

use new_zealand::nz;
use prime_scaling::{
    BenchmarkConfig, BenchmarkRunner, CandidateRange, Dispatcher, Error, TimingSample,
    run_benchmark, trimmed_average,
};
use testing::{count_primes_up_to, with_watchdog};

#[cfg_attr(miri, ignore)]
#[test]
fn runner_produces_one_sample_per_worker_count() {
    with_watchdog(|| {
        let runner = BenchmarkRunner::default();
        let range = CandidateRange::new(2, 1000).unwrap();
        let mut observed = Vec::new();

        let samples = runner
            .run(range, nz!(4), &mut |sample: &TimingSample| {
                observed.push(*sample);
            })
            .unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(observed, samples);

        for (index, sample) in samples.iter().enumerate() {
            assert_eq!(sample.worker_count().get(), index + 1);
            assert_eq!(sample.prime_count(), 168);
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn dispatch_agrees_with_sieve() {
    with_watchdog(|| {
        let dispatcher = Dispatcher::default();

        for (end, worker_count) in [(2, nz!(1)), (3, nz!(5)), (9_973, nz!(3)), (50_000, nz!(8))] {
            let range = CandidateRange::new(1, end).unwrap();
            let outcome = dispatcher.dispatch(range, worker_count).unwrap();

            let limit = usize::try_from(end).unwrap();
            assert_eq!(
                outcome.prime_count(),
                count_primes_up_to(limit),
                "primes up to {end} with {worker_count} workers"
            );
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn more_workers_than_candidates() {
    with_watchdog(|| {
        let outcome = Dispatcher::default()
            .dispatch(CandidateRange::new(2, 3).unwrap(), nz!(16))
            .unwrap();

        assert_eq!(outcome.prime_count(), 2);
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn timeout_aborts_whole_benchmark() {
    with_watchdog(|| {
        let config = BenchmarkConfig::builder()
            .range(CandidateRange::new(2, 1000).unwrap())
            .max_worker_count(nz!(4))
            .dispatch_timeout(Duration::ZERO)
            .build();

        let result = run_benchmark(&config);

        assert!(matches!(
            result,
            Err(Error::ComputationTimeout { worker_count, timeout })
                if worker_count.get() == 1 && timeout.is_zero()
        ));
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn full_benchmark_on_small_range() {
    with_watchdog(|| {
        let config = BenchmarkConfig::builder()
            .range(CandidateRange::new(2, 20_000).unwrap())
            .max_worker_count(nz!(4))
            .queue_capacity_per_worker(nz!(8))
            .build();

        let report = run_benchmark(&config).unwrap();

        assert_eq!(report.samples().len(), 4);
        assert!(
            report
                .samples()
                .iter()
                .all(|sample| sample.prime_count() == count_primes_up_to(20_000))
        );

        let recomputed = trimmed_average(report.samples()).unwrap();
        assert_eq!(
            testing::f64_diff_abs(recomputed, report.trimmed_average_millis(), 0.000_001),
            0.0
        );
    });
}
