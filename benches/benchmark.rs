use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use fanpool::{temporary_run, ThreadPoolBuilder};
use std::sync::atomic::{AtomicU64, Ordering};

/// A CPU-bound job body: compute the sum of a small range.
fn cpu_job(index: usize) -> u64 {
    (0..10u64).map(|x| x + index as u64).sum()
}

fn benchmark_batch_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_dispatch");
    group.sample_size(10);

    let participants = 4;
    let num_jobs = 10_000;

    group.bench_function("pool_10k_jobs", |b| {
        b.iter_batched(
            || {
                // Prepare a fresh pool each iteration
                ThreadPoolBuilder::new()
                    .participants(participants)
                    .build()
                    .unwrap()
            },
            |mut pool| {
                let sink = AtomicU64::new(0);
                pool.batch_run(num_jobs, |i| {
                    sink.fetch_add(cpu_job(i), Ordering::Relaxed);
                })
                .unwrap();
                pool.stop();
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("pool_reused_100_batches", |b| {
        b.iter_batched(
            || {
                ThreadPoolBuilder::new()
                    .participants(participants)
                    .build()
                    .unwrap()
            },
            |mut pool| {
                // Repeated dispatch on one pool: park/wake per batch,
                // no thread churn.
                let sink = AtomicU64::new(0);
                for _ in 0..100 {
                    pool.batch_run(100, |i| {
                        sink.fetch_add(cpu_job(i), Ordering::Relaxed);
                    })
                    .unwrap();
                }
                pool.stop();
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("solo_pool_10k_jobs", |b| {
        b.iter_batched(
            || ThreadPoolBuilder::new().participants(1).build().unwrap(),
            |mut pool| {
                let sink = AtomicU64::new(0);
                pool.batch_run(num_jobs, |i| {
                    sink.fetch_add(cpu_job(i), Ordering::Relaxed);
                })
                .unwrap();
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn benchmark_temporary(c: &mut Criterion) {
    let mut group = c.benchmark_group("temporary");
    group.sample_size(10);

    group.bench_function("temporary_run_4_threads", |b| {
        b.iter(|| {
            let sink = AtomicU64::new(0);
            temporary_run(4, |i| {
                sink.fetch_add(cpu_job(i), Ordering::Relaxed);
            });
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_batch_dispatch, benchmark_temporary);
criterion_main!(benches);
