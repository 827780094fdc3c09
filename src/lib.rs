//! # fanpool
//!
//! `fanpool` is a Rust library that provides a minimal fan-out thread
//! pool: a fixed set of persistent workers that repeatedly executes an
//! indexed batch of independent jobs with near-zero dispatch overhead.
//!
//! ## Features
//! - Dispatch a batch of `N` indexed jobs across all participants with a
//!   single call; every index in `[0, N)` runs exactly once.
//! - The calling thread participates in every dispatch, so a pool of `n`
//!   participants spawns only `n - 1` OS threads.
//! - Workers park on a condition variable between batches and consume no
//!   CPU while idle.
//! - Job panics are caught, aggregated, and reported after the batch
//!   drains instead of tearing down the process.
//! - Grow the pool, stop it (and keep using it single-threaded), or rehire
//!   workers after a stop.
//! - A standalone busy-wait [`SpinLock`] and a one-shot [`temporary_run`]
//!   helper for parallel loops that do not warrant a persistent pool.
//! - Metrics collection for monitoring pool activity.
//!
//! ## Usage
//!
//! ### Basic Usage
//! ```rust
//! use fanpool::ThreadPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! // Create a pool with 4 participants (3 workers + the calling thread).
//! let mut pool = ThreadPool::new(4).unwrap();
//!
//! let sum = AtomicUsize::new(0);
//! pool.batch_run(10, |i| {
//!     sum.fetch_add(i, Ordering::Relaxed);
//! })
//! .unwrap();
//! assert_eq!(sum.load(Ordering::Relaxed), 45);
//!
//! // Shut down the pool; it stays usable single-threaded afterwards.
//! pool.stop();
//! ```
//!
//! ### One Job per Participant
//! ```rust
//! use fanpool::ThreadPoolBuilder;
//!
//! let mut pool = ThreadPoolBuilder::new().participants(4).build().unwrap();
//!
//! // `run` dispatches exactly one job index per participant.
//! pool.run(|i| {
//!     println!("participant slot {} executed", i);
//! })
//! .unwrap();
//!
//! pool.stop();
//! ```
//!
//! ### Collecting Metrics
//! ```rust
//! use fanpool::{metrics::{ThreadPoolMetrics, AtomicMetricsCollector}, ThreadPoolBuilder};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(ThreadPoolMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let mut pool = ThreadPoolBuilder::new()
//!     .participants(4)
//!     .with_metrics_collector(collector)
//!     .build()
//!     .unwrap();
//!
//! pool.batch_run(100, |_| {}).unwrap();
//!
//! println!(
//!     "Executed jobs: {}",
//!     metrics.executed_jobs.load(std::sync::atomic::Ordering::SeqCst)
//! );
//!
//! pool.stop();
//! ```
//!
//! ### Busy-Wait Lock
//! ```rust
//! use fanpool::SpinLock;
//!
//! let lock = SpinLock::new();
//! assert!(lock.try_lock());
//! assert!(lock.is_locked());
//! lock.unlock();
//! ```

mod errors;
mod macros;
pub mod metrics;
pub mod pool;
mod spin;

pub use errors::PoolError;
pub use pool::{ThreadPool, ThreadPoolBuilder};
pub use spin::SpinLock;

/// Runs `job` once per index in `[0, threads)` on short-lived threads,
/// without a persistent pool.
///
/// For `threads <= 1` the job is invoked as `job(0)` synchronously on the
/// calling thread and nothing is spawned. Otherwise exactly `threads`
/// threads are created, the i-th invoking `job(i)`, and all of them are
/// joined before this returns. The threads are scoped, so `job` may borrow
/// from the caller's stack. A panicking job resumes unwinding on the
/// caller once every thread has been joined.
///
/// Intended for rare one-off fan-outs; for repeated dispatch use
/// [`ThreadPool`].
///
/// # Example
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let sum = AtomicUsize::new(0);
/// fanpool::temporary_run(4, |i| {
///     sum.fetch_add(i, Ordering::Relaxed);
/// });
/// assert_eq!(sum.load(Ordering::Relaxed), 6);
/// ```
pub fn temporary_run<F>(threads: usize, job: F)
where
    F: Fn(usize) + Sync,
{
    if threads <= 1 {
        job(0);
        return;
    }
    let job = &job;
    std::thread::scope(|scope| {
        for i in 0..threads {
            scope.spawn(move || job(i));
        }
    });
}
