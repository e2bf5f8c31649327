//! Cooperative pause/stop signaling for a collection run.
//!
//! A [`ControlChannel`] is shared between the caller (UI thread, Ctrl+C
//! handler, stdin reader) and the worker running the write loop. The caller
//! mutates it through [`pause`](ControlChannel::pause),
//! [`resume`](ControlChannel::resume) and [`stop`](ControlChannel::stop);
//! the worker only reads it at item boundaries through
//! [`checkpoint`](ControlChannel::checkpoint).
//!
//! Pausing parks the worker on a condition variable rather than a sleep
//! loop, so resuming or stopping wakes it immediately.
//!
//! # Example
//!
//! ```
//! use filecollect::collect::{Checkpoint, ControlChannel};
//!
//! let control = ControlChannel::new();
//! let worker_view = control.clone();
//!
//! control.pause();
//! assert!(control.is_paused());
//!
//! // Stopping while paused also clears the pause so the worker can exit
//! control.stop();
//! assert!(!control.is_paused());
//! assert_eq!(worker_view.checkpoint(), Checkpoint::Stop);
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Flags observed by the worker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ControlState {
    paused: bool,
    stopped: bool,
}

/// What the worker should do at an item boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Keep processing.
    Continue,
    /// Abandon the remaining groups and items.
    Stop,
}

/// Shared pause/stop state for one run.
///
/// Cloning yields another handle to the same state. `stopped` is one-way:
/// once set it stays set for the lifetime of the channel.
#[derive(Debug, Clone, Default)]
pub struct ControlChannel {
    inner: Arc<(Mutex<ControlState>, Condvar)>,
}

impl ControlChannel {
    /// Create a channel that is neither paused nor stopped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause the worker at its next item boundary.
    ///
    /// Has no effect once the run has been stopped.
    pub fn pause(&self) {
        let mut state = self.lock();
        if !state.stopped {
            state.paused = true;
            log::debug!("Collection paused");
        }
    }

    /// Resume a paused worker.
    pub fn resume(&self) {
        let mut state = self.lock();
        if state.paused {
            state.paused = false;
            log::debug!("Collection resumed");
        }
        self.inner.1.notify_all();
    }

    /// Stop the run. Also clears `paused` so a parked worker wakes and exits.
    pub fn stop(&self) {
        let mut state = self.lock();
        if !state.stopped {
            log::debug!("Collection stop requested");
        }
        state.stopped = true;
        state.paused = false;
        self.inner.1.notify_all();
    }

    /// Whether the run is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Whether the run has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Block while paused, then report whether to continue.
    ///
    /// Called by the worker before each group and before each item.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        let (_, condvar) = &*self.inner;
        let state = condvar
            .wait_while(self.lock(), |s| s.paused && !s.stopped)
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if state.stopped {
            Checkpoint::Stop
        } else {
            Checkpoint::Continue
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControlState> {
        // The state is two plain flags, so a poisoned lock is still usable
        self.inner
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
