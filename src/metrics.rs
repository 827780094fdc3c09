//! Metrics collection for the thread pool.
//!
//! This module defines the `MetricsCollector` trait for collecting metrics
//! about the pool's activity, as well as a default implementation backed by
//! atomic counters. Job execution is reported in bulk, once per participant
//! per batch, so the dispatch hot path never touches a collector.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trait for collecting metrics from the thread pool.
///
/// Implementations provide hooks for the key events in the pool's
/// lifecycle: batches opening and draining, jobs being executed, and
/// workers starting and stopping.
pub trait MetricsCollector: Send + Sync {
    /// Called when the driving thread opens a batch of `jobs` jobs.
    fn on_batch_started(&self, jobs: usize);
    /// Called when a batch has fully drained and all workers are parked.
    fn on_batch_completed(&self);
    /// Called once per participant per batch with the number of jobs that
    /// participant executed.
    fn on_jobs_executed(&self, count: usize);
    /// Called when a worker thread starts.
    fn on_worker_started(&self);
    /// Called when a worker thread stops.
    fn on_worker_stopped(&self);
}

/// Stores metrics for the thread pool using atomic counters.
pub struct ThreadPoolMetrics {
    /// Number of batches opened so far.
    pub started_batches: AtomicUsize,
    /// Number of batches that have fully drained.
    pub completed_batches: AtomicUsize,
    /// Total number of job invocations across all batches.
    pub executed_jobs: AtomicUsize,
    /// Number of worker threads currently alive.
    pub active_workers: AtomicUsize,
}

impl ThreadPoolMetrics {
    /// Creates a new `ThreadPoolMetrics` instance with all counters at
    /// zero.
    pub fn new() -> Self {
        Self {
            started_batches: AtomicUsize::new(0),
            completed_batches: AtomicUsize::new(0),
            executed_jobs: AtomicUsize::new(0),
            active_workers: AtomicUsize::new(0),
        }
    }
}

impl Default for ThreadPoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A default implementation of `MetricsCollector` using atomic counters,
/// backed by an `Arc<ThreadPoolMetrics>` so the counters can be inspected
/// from outside the pool.
pub struct AtomicMetricsCollector {
    /// Shared metrics storage.
    pub metrics: Arc<ThreadPoolMetrics>,
}

impl AtomicMetricsCollector {
    /// Creates a new `AtomicMetricsCollector` over the provided metrics.
    pub fn new(metrics: Arc<ThreadPoolMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    fn on_batch_started(&self, _jobs: usize) {
        self.metrics.started_batches.fetch_add(1, Ordering::SeqCst);
    }

    fn on_batch_completed(&self) {
        self.metrics
            .completed_batches
            .fetch_add(1, Ordering::SeqCst);
    }

    fn on_jobs_executed(&self, count: usize) {
        self.metrics.executed_jobs.fetch_add(count, Ordering::SeqCst);
    }

    fn on_worker_started(&self) {
        self.metrics.active_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_stopped(&self) {
        self.metrics.active_workers.fetch_sub(1, Ordering::SeqCst);
    }
}
