#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point running the prime counting benchmark with the default configuration.
//!
//! This module is excluded from mutation testing because testing process exit behavior
//! requires spawning subprocesses.

use std::process::ExitCode;

use prime_scaling::{BenchmarkConfig, init_logging, run_benchmark};
use tracing::error;

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    init_logging();

    match run_benchmark(&BenchmarkConfig::default()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("benchmark failed: {e}");
            ExitCode::FAILURE
        }
    }
}
