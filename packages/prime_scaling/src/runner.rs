use std::num::NonZero;
use std::thread;

use tracing::info;

use crate::{BenchmarkConfig, CandidateRange, Dispatcher, Result, TimingSample, trimmed_average};

/// Receives each timing sample as soon as its dispatch run completes.
///
/// Implemented for any `FnMut(&TimingSample)`, so a closure can be passed where an observer
/// is expected.
pub trait SampleObserver {
    /// Called once per completed run, in ascending worker count order.
    fn observe(&mut self, sample: &TimingSample);
}

impl<F> SampleObserver for F
where
    F: FnMut(&TimingSample),
{
    fn observe(&mut self, sample: &TimingSample) {
        self(sample);
    }
}

/// Reports every sample as an `info` level log line.
#[derive(Debug, Default)]
pub struct LogObserver;

impl SampleObserver for LogObserver {
    fn observe(&mut self, sample: &TimingSample) {
        info!(
            "Time with {} cores: {} ms.",
            sample.worker_count(),
            sample.elapsed_millis()
        );
    }
}

/// Runs the same prime counting workload once per worker count, from 1 upwards.
///
/// Runs happen strictly one after another. The first failing run ends the benchmark.
#[derive(Clone, Copy, Debug, Default)]
pub struct BenchmarkRunner {
    dispatcher: Dispatcher,
}

impl BenchmarkRunner {
    /// Creates a runner that performs each run through `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Counts the primes in `range` with every worker count from 1 to `max_worker_count`,
    /// handing each sample to `observer` as soon as it is recorded.
    ///
    /// Returns one sample per worker count in ascending worker count order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first run that fails. Remaining worker counts are not tried.
    pub fn run(
        &self,
        range: CandidateRange,
        max_worker_count: NonZero<usize>,
        observer: &mut impl SampleObserver,
    ) -> Result<Vec<TimingSample>> {
        let mut samples = Vec::with_capacity(max_worker_count.get());

        for worker_count in (1..=max_worker_count.get()).filter_map(NonZero::new) {
            let outcome = self.dispatcher.dispatch(range, worker_count)?;

            let sample =
                TimingSample::new(worker_count, outcome.prime_count(), outcome.elapsed_millis());
            observer.observe(&sample);
            samples.push(sample);
        }

        Ok(samples)
    }
}

/// Everything a completed benchmark produced.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkReport {
    samples: Vec<TimingSample>,
    trimmed_average_millis: f64,
}

impl BenchmarkReport {
    /// One sample per worker count, in ascending worker count order.
    #[must_use]
    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    /// Mean elapsed time after discarding the fastest and the slowest run.
    #[must_use]
    pub fn trimmed_average_millis(&self) -> f64 {
        self.trimmed_average_millis
    }
}

/// Runs the benchmark described by `config`, logging every sample and the trimmed average.
///
/// # Errors
///
/// Returns the first run failure, or [`Error::InsufficientSamples`][crate::Error::InsufficientSamples]
/// if the configured maximum worker count yields fewer than three samples.
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    // Reported for context only; worker counts are not capped by it.
    let available_parallelism = thread::available_parallelism().map_or(1, NonZero::get);

    info!(
        range = %config.range(),
        max_worker_count = config.max_worker_count().get(),
        available_parallelism,
        "starting prime counting benchmark"
    );

    let runner = BenchmarkRunner::new(config.dispatcher());
    let samples = runner.run(config.range(), config.max_worker_count(), &mut LogObserver)?;

    let trimmed_average_millis = trimmed_average(&samples)?;
    info!("Trimmed average: {trimmed_average_millis:.2} ms.");

    Ok(BenchmarkReport {
        samples,
        trimmed_average_millis,
    })
}
