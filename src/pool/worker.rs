//! Worker logic for the thread pool.

use std::sync::Arc;
use std::thread;

use super::dispatch::{Command, Dispatcher};

pub(crate) struct WorkerHandle {
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub(crate) fn new(thread: thread::JoinHandle<()>) -> Self {
        Self {
            thread: Some(thread),
        }
    }

    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Worker thread main loop.
///
/// A worker cycles `parked -> draining -> parked` until it observes
/// `Command::Stop`. It starts live (accounted by `Parking::register`
/// before the spawn) and parks on its first iteration.
pub(crate) fn worker_loop(shared: Arc<Dispatcher>) {
    loop {
        match shared.command() {
            Command::Park => shared.parking.park(|| shared.command() == Command::Park),
            Command::Dispatch => shared.drain(),
            Command::Stop => break,
        }
    }

    if let Some(m) = &shared.metrics {
        m.on_worker_stopped();
    }
}
