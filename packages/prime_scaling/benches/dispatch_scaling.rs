//! How dispatch throughput scales with the worker count on a modest range.

#![expect(missing_docs, reason = "benchmarks do not require API documentation")]

use std::num::NonZero;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use prime_scaling::{CandidateRange, Dispatcher};

const RANGE_END: i64 = 100_000;

fn dispatch_scaling(c: &mut Criterion) {
    let range = CandidateRange::new(2, RANGE_END).expect("constant range is valid");
    let dispatcher = Dispatcher::default();

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(range.len()));
    group.sample_size(10);

    for worker_count in [1, 2, 4, 8].into_iter().filter_map(NonZero::new) {
        group.bench_with_input(
            BenchmarkId::new("workers", worker_count),
            &worker_count,
            |b, &worker_count| {
                b.iter(|| {
                    dispatcher
                        .dispatch(range, worker_count)
                        .expect("dispatch within the default timeout")
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, dispatch_scaling);
criterion_main!(benches);
