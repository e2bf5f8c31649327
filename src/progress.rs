//! Progress reporting for collection runs.
//!
//! The engine reports through the [`ProgressCallback`] trait and never
//! depends on a live listener: a run without a callback behaves the same,
//! it just reports to nobody.
//!
//! Two implementations are provided:
//! - [`FnProgress`] adapts a pair of closures (`on_progress`, `on_log`)
//! - [`Progress`] drives an indicatif bar for the CLI
//!
//! # Accessible Mode
//!
//! When accessible mode is enabled, the bar uses ASCII characters and no
//! color so it reads well on screen readers and dumb terminals.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::collect::MergeEvent;

/// Receiver of progress and log events from a running collection.
pub trait ProgressCallback: Send + Sync {
    /// Called after each successfully processed item.
    ///
    /// # Arguments
    ///
    /// * `percent` - `processed * 100 / total`, floored, in `0..=100`
    fn on_progress(&self, percent: u8);

    /// Called for every notable event (directory created, file copied,
    /// duplicate skipped, item error, stopped, completed, ...).
    fn on_event(&self, event: &MergeEvent);
}

/// Closure-based callback, for callers that only want numbers and lines.
///
/// # Example
///
/// ```
/// use filecollect::progress::FnProgress;
///
/// let progress = FnProgress::new(
///     |percent| println!("{percent}%"),
///     |line| println!("{line}"),
/// );
/// ```
pub struct FnProgress<P, L> {
    on_progress: P,
    on_log: L,
}

impl<P, L> FnProgress<P, L>
where
    P: Fn(u8) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    /// Wrap a percentage closure and a log-line closure.
    #[must_use]
    pub fn new(on_progress: P, on_log: L) -> Self {
        Self {
            on_progress,
            on_log,
        }
    }
}

impl<P, L> ProgressCallback for FnProgress<P, L>
where
    P: Fn(u8) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        (self.on_progress)(percent);
    }

    fn on_event(&self, event: &MergeEvent) {
        (self.on_log)(&event.to_string());
    }
}

/// Progress reporter using indicatif.
///
/// Shows a single 0-100 bar while groups are written and prints each event
/// line above it.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
    accessible: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, neither the bar nor event lines are displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use filecollect::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_accessible(quiet, false)
    }

    /// Create a new progress reporter with accessible mode.
    #[must_use]
    pub fn with_accessible(quiet: bool, accessible: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
            accessible,
        }
    }

    /// Check if accessible mode is enabled.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    fn style(&self) -> ProgressStyle {
        if self.accessible {
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40}] {pos}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-")
        } else {
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█>-")
        }
    }

    /// Get the bar, creating it on first use.
    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        let mut guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let bar = guard.get_or_insert_with(|| {
            let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stderr());
            pb.set_style(self.style());
            pb
        });
        f(bar);
    }

    /// Print `line` above the bar if one is shown, or straight to stderr.
    fn print_line(&self, line: &str) {
        let guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match guard.as_ref() {
            Some(pb) => pb.println(line),
            None => eprintln!("{line}"),
        }
    }

    /// Finish and remove the bar, leaving the final line on screen.
    pub fn finish(&self) {
        let bar = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(pb) = bar {
            pb.finish();
        }
    }
}

impl ProgressCallback for Progress {
    fn on_progress(&self, percent: u8) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_position(u64::from(percent)));
    }

    fn on_event(&self, event: &MergeEvent) {
        log::debug!("{event}");
        if self.quiet {
            return;
        }

        let line = event.to_string();
        match event {
            MergeEvent::Completed { .. } | MergeEvent::Stopped | MergeEvent::RunFailed { .. } => {
                self.finish();
                eprintln!("{line}");
            }
            _ => self.print_line(&line),
        }
    }
}

/// Integer percentage of `processed` over `total`, floored and clamped to 100.
#[must_use]
pub fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let value = (processed as u128 * 100) / total as u128;
    value.min(100) as u8
}
