//! Cost of a single primality test for candidates of different magnitudes.

#![expect(missing_docs, reason = "benchmarks do not require API documentation")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use prime_scaling::is_prime;

fn trial_division(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_prime");

    // Primes force the full sqrt(n) scan, composites with small factors exit early.
    for candidate in [97_i64, 7_919, 1_000_003, 4_999_999, 2_147_483_647] {
        group.bench_with_input(
            BenchmarkId::new("prime", candidate),
            &candidate,
            |b, &candidate| {
                b.iter(|| is_prime(black_box(candidate)));
            },
        );
    }

    group.bench_function("composite_even", |b| {
        b.iter(|| is_prime(black_box(4_999_998)));
    });

    group.finish();
}

criterion_group!(benches, trial_division);
criterion_main!(benches);
