//! Signal handling for graceful shutdown.
//!
//! Ctrl+C is routed to the [`ControlChannel`] of the run currently attached
//! to the process-wide [`ShutdownHandler`]. The run observes the stop at its
//! next checkpoint, finishes the item in flight and reports
//! "Operation stopped".
//!
//! # Usage
//!
//! ```rust,no_run
//! use filecollect::collect::ControlChannel;
//! use filecollect::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let control = ControlChannel::new();
//! handler.attach(control.clone());
//!
//! // ... run the collection with `control` ...
//!
//! if control.is_stopped() {
//!     println!("Interrupted");
//! }
//! ```
//!
//! # Exit Codes
//!
//! An interrupted run exits with code 130 (128 + SIGINT).

use std::io::Write;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::collect::ControlChannel;

/// The control channel of the run to stop on Ctrl+C.
///
/// Clones share the same slot, so the clone captured by the signal hook
/// sees channels attached later.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    control: Arc<Mutex<Option<ControlChannel>>>,
}

impl ShutdownHandler {
    /// Create a handler with no run attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route shutdown requests to `control`, replacing any previous channel.
    pub fn attach(&self, control: ControlChannel) {
        *self.control.lock().unwrap_or_else(PoisonError::into_inner) = Some(control);
    }

    /// Stop routing shutdown requests to a run.
    pub fn detach(&self) {
        self.control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether a run is currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop the attached run, if any.
    pub fn request_shutdown(&self) {
        if let Some(control) = self
            .control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            control.stop();
        }
    }

}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that stops the attached run.
///
/// The hook can only be registered once per process. Later calls reset and
/// return the same handler with no run attached, so repeated `run_app()` calls (as in tests) keep
/// working. If another hook was registered elsewhere, an unhooked handler is
/// returned that still honors [`ShutdownHandler::request_shutdown`].
///
/// # Errors
///
/// Currently always succeeds; see above for the fallback.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.detach();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let hook = handler.clone();

    match ctrlc::set_handler(move || {
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Stopping...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
        hook.request_shutdown();
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(_) => {
            if let Some(handler) = GLOBAL_HANDLER.get() {
                handler.detach();
                Ok(handler.clone())
            } else {
                log::debug!("Ctrl+C handler already registered, using unhooked handler");
                let fallback = ShutdownHandler::new();
                let _ = GLOBAL_HANDLER.set(fallback.clone());
                Ok(fallback)
            }
        }
    }
}
