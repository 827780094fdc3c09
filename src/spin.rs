//! Busy-wait mutual exclusion.

use crossbeam::utils::Backoff;
use std::sync::atomic::{AtomicBool, Ordering};

/// A busy-wait lock over a single atomic flag.
///
/// Unlike a mutex, a contended [`lock`](SpinLock::lock) never parks the
/// calling thread: it spins on the flag, backing off to a scheduler yield
/// after a bounded number of attempts. Intended for critical sections that
/// are short compared to the cost of a park/unpark round trip.
///
/// The lock is not reentrant: a thread calling `lock` twice without an
/// intervening `unlock` deadlocks itself. There is no fairness guarantee
/// among contending threads.
///
/// # Example
/// ```rust
/// use fanpool::SpinLock;
///
/// static LOCK: SpinLock = SpinLock::new();
///
/// LOCK.lock();
/// // critical section
/// LOCK.unlock();
/// ```
pub struct SpinLock {
    flag: AtomicBool,
}

impl SpinLock {
    /// Creates a new, unheld lock.
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Blocks until the flag transitions from free to held.
    ///
    /// Spins on an atomic exchange; after a bounded number of failed
    /// attempts each retry yields to the scheduler instead of burning the
    /// CPU, but the thread never blocks on a wait queue.
    pub fn lock(&self) {
        let backoff = Backoff::new();
        while self.flag.swap(true, Ordering::AcqRel) {
            backoff.snooze();
        }
    }

    /// Releases the lock.
    ///
    /// Release-ordered: writes made inside the critical section are
    /// visible to the next acquirer.
    pub fn unlock(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Makes a single acquisition attempt; returns whether it succeeded.
    pub fn try_lock(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    /// Returns the current state of the flag.
    ///
    /// Advisory only: under contention the answer can be stale the instant
    /// it is returned.
    pub fn is_locked(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}
