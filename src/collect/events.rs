//! Run lifecycle states and the events reported while a run executes.
//!
//! Every [`MergeEvent`] renders as one human-readable log line through its
//! `Display` implementation; callers that only want text can forward
//! `event.to_string()` to their log view.

use std::path::PathBuf;

use serde::Serialize;

/// Lifecycle of a single run.
///
/// `Idle → Scanning → Filtering → Writing → {Completed | Stopped | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created, not started
    Idle,
    /// Walking the input roots
    Scanning,
    /// Aggregating and applying the threshold
    Filtering,
    /// Materializing groups into the output tree
    Writing,
    /// Finished normally (including "no qualifying groups")
    Completed,
    /// Abandoned after a stop request
    Stopped,
    /// Aborted by a run-level error
    Failed,
}

impl RunState {
    /// Whether the run has ended.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Filtering => "filtering",
            Self::Writing => "writing",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A notable event during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MergeEvent {
    /// The top-level output directory was created.
    OutputDirCreated {
        /// Output root.
        path: PathBuf,
    },
    /// A group's output directory was created.
    GroupDirCreated {
        /// Base name shared by the group's items.
        group: String,
        /// Directory the group is written to.
        path: PathBuf,
    },
    /// A root-level file was copied.
    RootFileCopied {
        /// Source file name.
        name: String,
        /// Path of the copy, including any `_N` suffix.
        dest: PathBuf,
    },
    /// A nested file was copied under its relative path.
    SubfolderFileCopied {
        /// Source file name.
        name: String,
        /// Path of the copy, including any `_N` suffix.
        dest: PathBuf,
    },
    /// A file was skipped because its content was already written in this group.
    DuplicateSkipped {
        /// Source file name.
        name: String,
    },
    /// An image folder was copied as a whole.
    FolderCopied {
        /// Source folder name.
        name: String,
        /// Directory the folder was copied to.
        dest: PathBuf,
    },
    /// An image folder was skipped because it was already copied in this group.
    FolderAlreadyCopied {
        /// Source folder name.
        name: String,
    },
    /// An item failed; processing continues with the next item.
    ItemFailed {
        /// Name of the failed item.
        name: String,
        /// Error message.
        error: String,
    },
    /// No group met the threshold; nothing was written.
    NoQualifyingGroups,
    /// The run was stopped before finishing.
    Stopped,
    /// The run finished normally.
    Completed {
        /// Number of groups written.
        groups: usize,
    },
    /// The run was aborted by a run-level error.
    RunFailed {
        /// Error message.
        error: String,
    },
}

impl std::fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutputDirCreated { path } => {
                write!(f, "Created output directory: {}", path.display())
            }
            Self::GroupDirCreated { group, .. } => write!(f, "Created group directory: {group}"),
            Self::RootFileCopied { name, .. } => write!(f, "Copied root file: {name}"),
            Self::SubfolderFileCopied { name, .. } => write!(f, "Copied subfolder file: {name}"),
            Self::DuplicateSkipped { name } => write!(f, "Skipped duplicate file: {name}"),
            Self::FolderCopied { name, .. } => write!(f, "Copied image folder: {name}"),
            Self::FolderAlreadyCopied { name } => {
                write!(f, "Skipped already copied folder: {name}")
            }
            Self::ItemFailed { name, error } => write!(f, "Error processing {name}: {error}"),
            Self::NoQualifyingGroups => write!(f, "No qualifying groups found"),
            Self::Stopped => write!(f, "Operation stopped"),
            Self::Completed { groups } => {
                write!(f, "Collection complete: {groups} groups merged")
            }
            Self::RunFailed { error } => write!(f, "Collection failed: {error}"),
        }
    }
}
