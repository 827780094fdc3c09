//! Error types for the thread pool.
//!
//! Two things can go wrong: the OS refuses to create a worker thread while
//! constructing or growing a pool, or one or more jobs panic during a
//! batch. Both surface synchronously to the driving thread; a job panic is
//! reported only after the batch has fully drained.

/// Represents errors that can occur in the thread pool.
#[derive(Debug)]
pub enum PoolError {
    /// One or more jobs in the batch panicked. The batch still drained
    /// completely; `first_index` is the index of the first panic observed.
    JobPanicked {
        /// How many job invocations panicked.
        panicked: usize,
        /// Index of the first panicking job observed.
        first_index: usize,
    },
    /// The OS failed to create a worker thread.
    Spawn(std::io::Error),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::JobPanicked {
                panicked,
                first_index,
            } => write!(
                f,
                "{} job(s) panicked during the batch, first at index {}",
                panicked, first_index
            ),
            PoolError::Spawn(e) => write!(f, "Failed to spawn worker thread: {}", e),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
