//! Line-based run control from stdin.
//!
//! With `collect --interactive`, each line read from stdin is mapped to a
//! [`RunCommand`] and applied to the run's [`ControlChannel`]:
//!
//! | Input            | Command  |
//! |------------------|----------|
//! | `p`, `pause`     | pause    |
//! | `r`, `resume`    | resume   |
//! | `s`, `stop`, `q` | stop     |
//!
//! # Example
//!
//! ```
//! use filecollect::collect::ControlChannel;
//! use filecollect::interactive::{apply_commands, RunCommand};
//!
//! assert_eq!(RunCommand::parse(" P "), Some(RunCommand::Pause));
//!
//! let control = ControlChannel::new();
//! apply_commands("p\nr\nq\n".as_bytes(), &control);
//! assert!(control.is_stopped());
//! ```

use std::io::{self, BufRead};
use std::thread;

use crate::collect::ControlChannel;

/// A control command typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    /// Block the run before its next item.
    Pause,
    /// Release a paused run.
    Resume,
    /// Stop the run after the item in flight.
    Stop,
}

impl RunCommand {
    /// Parse one input line (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "stop" | "q" | "quit" => Some(Self::Stop),
            _ => None,
        }
    }

    /// Apply this command to a run.
    pub fn apply(self, control: &ControlChannel) {
        match self {
            Self::Pause => {
                control.pause();
                log::info!("Paused; enter r to resume or s to stop");
            }
            Self::Resume => {
                control.resume();
                log::info!("Resumed");
            }
            Self::Stop => {
                control.stop();
                log::info!("Stop requested");
            }
        }
    }
}

/// Read commands from `input` until it ends or the run is stopped.
pub fn apply_commands<R: BufRead>(input: R, control: &ControlChannel) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        match RunCommand::parse(&line) {
            Some(command) => command.apply(control),
            None if line.trim().is_empty() => {}
            None => log::warn!("Unknown command '{}' (use p, r or s)", line.trim()),
        }
        if control.is_stopped() {
            break;
        }
    }
}

/// Start a detached thread applying stdin commands to `control`.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_reader(control: ControlChannel) -> io::Result<()> {
    thread::Builder::new()
        .name("filecollect-stdin".to_string())
        .spawn(move || apply_commands(io::stdin().lock(), &control))?;
    Ok(())
}
