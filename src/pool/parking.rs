//! Worker suspension and the all-parked barrier.

use std::sync::{Condvar, Mutex};

/// Parks workers and lets the driving thread wait for all of them to be
/// parked again.
///
/// One mutex guards the count of live (unparked) workers, and one condvar
/// is shared by parked workers and the idle-waiting driver. The shared
/// mutex is load-bearing: a worker observes the wake condition and bumps
/// the live count inside a single critical section, so [`wait_idle`]
/// either sees that worker as live or the worker sees the reset command
/// and stays parked. With separate locks the driver could return from a
/// batch while a straggler was still entering the drain loop.
///
/// [`wait_idle`]: Parking::wait_idle
pub(crate) struct Parking {
    live: Mutex<usize>,
    cvar: Condvar,
}

impl Parking {
    pub(crate) fn new() -> Self {
        Self {
            live: Mutex::new(0),
            cvar: Condvar::new(),
        }
    }

    /// Accounts for `n` workers that are about to be spawned live.
    pub(crate) fn register(&self, n: usize) {
        let mut live = self.live.lock().unwrap();
        *live += n;
    }

    /// Removes `n` workers that were registered but will never arrive
    /// (spawn failure).
    pub(crate) fn deregister(&self, n: usize) {
        let mut live = self.live.lock().unwrap();
        *live -= n;
        if *live == 0 {
            self.cvar.notify_all();
        }
    }

    /// Parks the calling worker while `should_park` holds.
    ///
    /// The live count is decremented on entry (waking the driver if this
    /// was the last live worker) and incremented again before the mutex is
    /// released on wake-up.
    pub(crate) fn park<P: Fn() -> bool>(&self, should_park: P) {
        let mut live = self.live.lock().unwrap();
        *live -= 1;
        if *live == 0 {
            self.cvar.notify_all();
        }
        while should_park() {
            live = self.cvar.wait(live).unwrap();
        }
        *live += 1;
    }

    /// Blocks until every registered worker is parked.
    pub(crate) fn wait_idle(&self) {
        let mut live = self.live.lock().unwrap();
        while *live > 0 {
            live = self.cvar.wait(live).unwrap();
        }
    }

    /// Wakes every parked worker.
    ///
    /// Takes and releases the mutex first so a worker that has checked its
    /// predicate but not yet started waiting cannot miss the broadcast.
    pub(crate) fn wake_all(&self) {
        drop(self.live.lock().unwrap());
        self.cvar.notify_all();
    }

    /// Forces the live count back to zero after workers have been joined.
    pub(crate) fn reset(&self) {
        let mut live = self.live.lock().unwrap();
        *live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Parking;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_idle_returns_once_all_workers_park() {
        let parking = Arc::new(Parking::new());
        let hold = Arc::new(AtomicBool::new(true));
        let parked_rounds = Arc::new(AtomicUsize::new(0));

        parking.register(2);
        let mut handles = Vec::new();
        for _ in 0..2 {
            let parking = Arc::clone(&parking);
            let hold = Arc::clone(&hold);
            let parked_rounds = Arc::clone(&parked_rounds);
            handles.push(thread::spawn(move || {
                parked_rounds.fetch_add(1, Ordering::SeqCst);
                parking.park(|| hold.load(Ordering::SeqCst));
            }));
        }

        // Returns only after both workers have decremented the live count.
        parking.wait_idle();
        assert_eq!(parked_rounds.load(Ordering::SeqCst), 2);

        hold.store(false, Ordering::SeqCst);
        parking.wake_all();
        for h in handles {
            h.join().unwrap();
        }
        // Both workers left parked state and never re-parked.
        parking.reset();
        parking.wait_idle();
    }

    #[test]
    fn wait_idle_blocks_while_a_worker_is_live() {
        let parking = Arc::new(Parking::new());
        parking.register(1);

        let waiter = {
            let parking = Arc::clone(&parking);
            thread::spawn(move || parking.wait_idle())
        };

        // The registered worker has not parked yet, so the waiter stays
        // blocked.
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        let hold = AtomicBool::new(false);
        parking.park(|| hold.load(Ordering::SeqCst));
        // park() re-increments on its way out; deregister the departed
        // worker so the waiter can finish.
        parking.deregister(1);
        waiter.join().unwrap();
    }
}
