pub(crate) mod dispatch;
pub(crate) mod parking;
mod worker;

use std::sync::Arc;
use std::thread;

use crate::errors::PoolError;
use crate::metrics::MetricsCollector;
use dispatch::{Command, Dispatcher};
use worker::{worker_loop, WorkerHandle};

/// A fixed-size pool of persistent worker threads that repeatedly executes
/// indexed batches of independent jobs.
///
/// The driving thread always takes part in a dispatch, so a pool built for
/// `n` participants spawns only `n - 1` OS threads. Between batches the
/// workers are parked on a condition variable and consume no CPU; during a
/// batch every participant races a shared atomic cursor to claim job
/// indices, which keeps dispatch overhead near zero at the cost of
/// spinning workers while a batch is open.
///
/// All driving operations ([`batch_run`], [`run`], [`grow`], [`stop`])
/// take `&mut self`: a pool has exactly one driver at a time, and the
/// borrow checker enforces it.
///
/// [`batch_run`]: ThreadPool::batch_run
/// [`run`]: ThreadPool::run
/// [`grow`]: ThreadPool::grow
/// [`stop`]: ThreadPool::stop
pub struct ThreadPool {
    shared: Arc<Dispatcher>,
    workers: Vec<WorkerHandle>,
    next_worker: usize,
}

impl ThreadPool {
    /// Creates a pool with `participants` dispatch participants: the
    /// calling thread plus `participants - 1` spawned workers (none when
    /// `participants <= 1`). Blocks until every spawned worker is parked.
    ///
    /// # Errors
    /// Returns [`PoolError::Spawn`] if the OS refuses to create a worker
    /// thread.
    pub fn new(participants: usize) -> Result<Self, PoolError> {
        ThreadPoolBuilder::new().participants(participants).build()
    }

    /// Number of dispatch participants: the spawned workers plus the
    /// driving thread.
    pub fn participants(&self) -> usize {
        self.workers.len() + 1
    }

    /// Number of spawned worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Spawns `additional` worker threads and waits for them to reach the
    /// parked state before returning.
    ///
    /// The pool never shrinks; use [`stop`](ThreadPool::stop) to discard
    /// all workers.
    ///
    /// # Errors
    /// Returns [`PoolError::Spawn`] if a thread cannot be created. Workers
    /// spawned before the failure are kept and parked; nothing is retried.
    pub fn grow(&mut self, additional: usize) -> Result<(), PoolError> {
        self.shared.parking.register(additional);
        for spawned in 0..additional {
            let shared = Arc::clone(&self.shared);
            let builder =
                thread::Builder::new().name(format!("fanpool-worker-{}", self.next_worker));
            match builder.spawn(move || worker_loop(shared)) {
                Ok(handle) => {
                    self.workers.push(WorkerHandle::new(handle));
                    self.next_worker += 1;
                    if let Some(m) = &self.shared.metrics {
                        m.on_worker_started();
                    }
                }
                Err(e) => {
                    // The workers that never spawned were pre-registered
                    // as live; settle the ledger before waiting for the
                    // ones that did.
                    self.shared.parking.deregister(additional - spawned);
                    self.shared.parking.wait_idle();
                    return Err(PoolError::Spawn(e));
                }
            }
        }
        self.shared.parking.wait_idle();
        Ok(())
    }

    /// Runs one batch: invokes `job` exactly once for every index in
    /// `[0, jobs)`, load-balanced across all participants, and returns
    /// only after every index has been processed and every worker is
    /// parked again.
    ///
    /// The assignment of indices to threads is unspecified. The calling
    /// thread participates, so a pool with no spawned workers still drains
    /// the whole batch.
    ///
    /// # Errors
    /// A panicking job does not tear down the pool: the panic is caught,
    /// the remaining indices still execute, and the batch reports
    /// [`PoolError::JobPanicked`] once drained.
    pub fn batch_run<F>(&mut self, jobs: usize, job: F) -> Result<(), PoolError>
    where
        F: Fn(usize) + Sync,
    {
        if let Some(m) = &self.shared.metrics {
            m.on_batch_started(jobs);
        }

        // The borrow of `job` is alive until after wait_idle below, which
        // is exactly the window in which workers may dereference it.
        self.shared.install(&job, jobs);
        if !self.workers.is_empty() {
            self.shared.set_command(Command::Dispatch);
            self.shared.parking.wake_all();
        }
        self.shared.drain();
        self.shared.parking.wait_idle();
        self.shared.clear();

        let outcome = self.shared.outcome();
        if let Some(m) = &self.shared.metrics {
            m.on_batch_completed();
        }
        outcome
    }

    /// Convenience form of [`batch_run`](ThreadPool::batch_run) with one
    /// job per participant, the driving thread included.
    pub fn run<F>(&mut self, job: F) -> Result<(), PoolError>
    where
        F: Fn(usize) + Sync,
    {
        let participants = self.participants();
        self.batch_run(participants, job)
    }

    /// Wakes every worker into the terminal state, joins them, and
    /// discards the worker set.
    ///
    /// The pool stays usable afterwards: a [`batch_run`] executes solely
    /// on the calling thread, and [`grow`] rehires workers.
    ///
    /// [`batch_run`]: ThreadPool::batch_run
    /// [`grow`]: ThreadPool::grow
    pub fn stop(&mut self) {
        self.shared.set_command(Command::Stop);
        self.shared.parking.wake_all();
        for worker in &mut self.workers {
            worker.join();
        }
        self.workers.clear();
        self.shared.parking.reset();
        self.shared.set_command(Command::Park);
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builder for [`ThreadPool`].
pub struct ThreadPoolBuilder {
    participants: usize,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl ThreadPoolBuilder {
    pub fn new() -> Self {
        Self {
            participants: 4,
            metrics_collector: None,
        }
    }

    /// Total number of dispatch participants, the driving thread included.
    /// Defaults to 4.
    pub fn participants(mut self, n: usize) -> Self {
        self.participants = n;
        self
    }

    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    /// Builds the pool, spawning `participants - 1` workers and blocking
    /// until all of them are parked.
    pub fn build(self) -> Result<ThreadPool, PoolError> {
        let shared = Arc::new(Dispatcher::new(self.metrics_collector));
        let mut pool = ThreadPool {
            shared,
            workers: Vec::new(),
            next_worker: 0,
        };
        pool.grow(self.participants.saturating_sub(1))?;
        Ok(pool)
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
