//! # Macros for `fanpool`
//!
//! This module contains macros to simplify usage of the `fanpool` library:
//! building pools with less boilerplate and logging the metrics counters.

/// Creates a thread pool with various configurations.
///
/// # Examples
/// ```rust
/// use fanpool::{create_thread_pool, ThreadPoolBuilder};
///
/// let mut pool = create_thread_pool!(participants: 4);
/// pool.run(|i| println!("job {} executed", i)).unwrap();
/// pool.stop();
/// ```
#[macro_export]
macro_rules! create_thread_pool {
    () => {
        ThreadPoolBuilder::new()
            .build()
            .expect("failed to spawn pool workers")
    };
    (participants: $n:expr) => {
        ThreadPoolBuilder::new()
            .participants($n)
            .build()
            .expect("failed to spawn pool workers")
    };
    (participants: $n:expr, metrics: $collector:expr) => {
        ThreadPoolBuilder::new()
            .participants($n)
            .with_metrics_collector($collector)
            .build()
            .expect("failed to spawn pool workers")
    };
}

/// Logs the current metrics of the thread pool.
///
/// Prints the batch, job, and worker counters of a
/// [`ThreadPoolMetrics`](crate::metrics::ThreadPoolMetrics).
///
/// # Example
/// ```rust
/// use fanpool::{metrics::{ThreadPoolMetrics, AtomicMetricsCollector}, ThreadPoolBuilder, log_metrics};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(ThreadPoolMetrics::new());
/// let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
/// let mut pool = ThreadPoolBuilder::new()
///     .with_metrics_collector(collector)
///     .build()
///     .unwrap();
///
/// pool.batch_run(8, |_| {}).unwrap();
/// log_metrics!(metrics);
/// pool.stop();
/// ```
#[macro_export]
macro_rules! log_metrics {
    ($metrics:expr) => {
        println!(
            "Started batches: {}",
            $metrics
                .started_batches
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Completed batches: {}",
            $metrics
                .completed_batches
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Executed jobs: {}",
            $metrics
                .executed_jobs
                .load(std::sync::atomic::Ordering::SeqCst)
        );
        println!(
            "Active workers: {}",
            $metrics
                .active_workers
                .load(std::sync::atomic::Ordering::SeqCst)
        );
    };
}
