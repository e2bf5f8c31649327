//! Structured error handling and exit codes.

use serde::Serialize;

use crate::collect::{RunOutcome, RunSummary};

/// Exit codes for the filecollect application.
///
/// - 0: Success (every surviving group was merged without errors)
/// - 1: General error (invalid input or a run-level failure)
/// - 2: No qualifying groups (nothing reached the threshold, nothing written)
/// - 3: Partial success (completed with some item or scan errors)
/// - 130: Stopped (Ctrl+C or an interactive stop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: all groups merged.
    Success = 0,
    /// General error: the run could not be carried out.
    GeneralError = 1,
    /// No qualifying groups: no group reached the threshold.
    NoGroups = 2,
    /// Partial success: some items or entries failed.
    PartialSuccess = 3,
    /// Stopped before finishing.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FC000",
            Self::GeneralError => "FC001",
            Self::NoGroups => "FC002",
            Self::PartialSuccess => "FC003",
            Self::Interrupted => "FC130",
        }
    }

    /// Map a finished run to its exit code.
    #[must_use]
    pub fn from_summary(summary: &RunSummary) -> Self {
        match summary.outcome {
            RunOutcome::Stopped => Self::Interrupted,
            RunOutcome::NoQualifyingGroups => Self::NoGroups,
            RunOutcome::Completed if summary.has_errors() => Self::PartialSuccess,
            RunOutcome::Completed => Self::Success,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
