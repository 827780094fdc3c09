//! The dispatch state machine shared between the driving thread and the
//! workers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use super::parking::Parking;
use crate::errors::PoolError;
use crate::metrics::MetricsCollector;

/// Pool-wide command flag.
///
/// Legal transitions: `Park -> Dispatch` (driver opens a batch),
/// `Dispatch -> Park` (any participant observing cursor exhaustion; the
/// store is idempotent), `* -> Stop` (driver) and `Stop -> Park` (driver,
/// after joining the workers).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Command {
    /// Workers sleep on the condvar.
    Park = 0,
    /// Participants race over the job cursor.
    Dispatch = 1,
    /// Workers exit their loop and terminate.
    Stop = 2,
}

impl Command {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Command::Park,
            1 => Command::Dispatch,
            _ => Command::Stop,
        }
    }
}

/// Signature of the monomorphized entry point stored in the descriptor.
/// Returns whether the job completed without panicking.
type Trampoline = unsafe fn(*const (), usize) -> bool;

/// Invokes the type-erased job for one index, absorbing a panic into the
/// return value.
unsafe fn invoke<F: Fn(usize)>(context: *const (), index: usize) -> bool {
    let job = &*(context as *const F);
    catch_unwind(AssertUnwindSafe(|| job(index))).is_ok()
}

const NO_PANIC: usize = usize::MAX;

/// Shared dispatch state: the command flag, the active batch descriptor,
/// panic aggregation, and the parking/barrier primitive.
///
/// The descriptor (job pointer, trampoline, total, cursor) has a single
/// writer, the driving thread, which only touches it while the pool is
/// quiescent; all participants read it during the dispatching window. The
/// `Release` store of `Command::Dispatch` publishes the plain descriptor
/// stores to every worker that `Acquire`-loads the command.
pub(crate) struct Dispatcher {
    command: AtomicU8,
    context: AtomicPtr<()>,
    trampoline: AtomicUsize,
    total: AtomicUsize,
    cursor: AtomicUsize,
    panicked: AtomicUsize,
    first_panic: AtomicUsize,
    pub(crate) parking: Parking,
    pub(crate) metrics: Option<Arc<dyn MetricsCollector>>,
}

impl Dispatcher {
    pub(crate) fn new(metrics: Option<Arc<dyn MetricsCollector>>) -> Self {
        Self {
            command: AtomicU8::new(Command::Park as u8),
            context: AtomicPtr::new(ptr::null_mut()),
            trampoline: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            cursor: AtomicUsize::new(0),
            panicked: AtomicUsize::new(0),
            first_panic: AtomicUsize::new(NO_PANIC),
            parking: Parking::new(),
            metrics,
        }
    }

    pub(crate) fn command(&self) -> Command {
        Command::from_u8(self.command.load(Ordering::Acquire))
    }

    pub(crate) fn set_command(&self, command: Command) {
        self.command.store(command as u8, Ordering::Release);
    }

    /// Installs the descriptor for a new batch.
    ///
    /// Must only be called by the driving thread while the pool is
    /// quiescent (all workers parked). The caller guarantees `job` stays
    /// alive and unmoved until [`Parking::wait_idle`] has returned for
    /// this batch; `ThreadPool::batch_run` enforces that by blocking.
    pub(crate) fn install<F: Fn(usize) + Sync>(&self, job: &F, total: usize) {
        self.context
            .store(job as *const F as *const () as *mut (), Ordering::Relaxed);
        self.trampoline
            .store(invoke::<F> as Trampoline as usize, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.cursor.store(0, Ordering::Relaxed);
        self.panicked.store(0, Ordering::Relaxed);
        self.first_panic.store(NO_PANIC, Ordering::Relaxed);
    }

    /// Clears the descriptor once the batch has fully drained, so no stale
    /// pointer outlives the call that owned the job.
    pub(crate) fn clear(&self) {
        self.context.store(ptr::null_mut(), Ordering::Relaxed);
        self.trampoline.store(0, Ordering::Relaxed);
        self.total.store(0, Ordering::Relaxed);
    }

    /// The drain loop every participant runs, caller included: claim the
    /// next index with a fetch-and-increment, invoke the job while the
    /// claim is in range, and flip the command back to `Park` once the
    /// cursor is exhausted.
    ///
    /// A claim at or past `total` never dereferences the descriptor, so a
    /// straggler that wakes into an already-drained batch exits without
    /// touching the job.
    pub(crate) fn drain(&self) {
        let total = self.total.load(Ordering::Acquire);
        let context = self.context.load(Ordering::Acquire);
        let trampoline = self.trampoline.load(Ordering::Acquire);

        let mut executed = 0usize;
        loop {
            let index = self.cursor.fetch_add(1, Ordering::Relaxed);
            if index >= total {
                break;
            }
            // SAFETY: `index < total` implies a batch is active, so
            // `context` points at the job installed by the driving thread,
            // which `batch_run` keeps borrowed until the barrier passes.
            // The stored trampoline was monomorphized for that job's type.
            let call: Trampoline = unsafe { std::mem::transmute(trampoline) };
            let completed = unsafe { call(context, index) };
            if !completed {
                self.record_panic(index);
            }
            executed += 1;
        }
        self.set_command(Command::Park);

        if executed > 0 {
            if let Some(m) = &self.metrics {
                m.on_jobs_executed(executed);
            }
        }
    }

    fn record_panic(&self, index: usize) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
        let _ = self.first_panic.compare_exchange(
            NO_PANIC,
            index,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }

    /// The aggregated result of the batch that just drained. Valid once
    /// the barrier has passed.
    pub(crate) fn outcome(&self) -> Result<(), PoolError> {
        let panicked = self.panicked.load(Ordering::Acquire);
        if panicked == 0 {
            Ok(())
        } else {
            Err(PoolError::JobPanicked {
                panicked,
                first_index: self.first_panic.load(Ordering::Acquire),
            })
        }
    }
}
