#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Measures how counting the primes in a fixed range scales with the number of worker threads.
//!
//! Every candidate in the range is tested for primality as an independent unit of work on a
//! fixed-size group of worker threads. The workload is repeated with 1, 2, ... N workers and
//! the wall-clock time of each run is recorded as a [`TimingSample`]. The samples are then
//! summarized as a trimmed average, discarding the fastest and the slowest run.
//!
//! ```
//! use new_zealand::nz;
//! use prime_scaling::{BenchmarkRunner, CandidateRange, LogObserver, trimmed_average};
//!
//! let runner = BenchmarkRunner::default();
//! let samples = runner.run(CandidateRange::new(2, 1000)?, nz!(3), &mut LogObserver)?;
//!
//! assert!(samples.iter().all(|sample| sample.prime_count() == 168));
//!
//! let average_millis = trimmed_average(&samples)?;
//! println!("Trimmed average: {average_millis} ms");
//! # Ok::<(), prime_scaling::Error>(())
//! ```
//!
//! # Dispatch runs
//!
//! Each [`Dispatcher::dispatch()`] call creates its own worker group and prime counter and
//! tears both down before returning. Submission blocks while the bounded task queue is full.
//! A run that does not finish within the dispatch timeout (5 minutes by default) fails with
//! [`Error::ComputationTimeout`] and produces no result.
//!
//! # Failures
//!
//! Every failure aborts the benchmark. If a unit of work fails or panics, the queued units of
//! the same run are discarded and the failure is returned from the dispatch call. Ranges are
//! validated on construction, so primality tests never see a non-positive candidate.

mod config;
mod dispatch;
mod error;
mod logging;
mod pool;
mod primality;
mod range;
mod runner;
mod sample;
mod stats;
mod stopwatch;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use logging::*;
pub use primality::*;
pub use range::*;
pub use runner::*;
pub use sample::*;
pub use stats::*;
pub use stopwatch::*;
