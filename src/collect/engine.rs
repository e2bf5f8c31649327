//! Collection engine: scan, aggregate, filter, write.
//!
//! # Overview
//!
//! [`Collector`] runs the whole pipeline for one invocation:
//!
//! 1. **Scanning** - every input root is walked by a
//!    [`FolderScanner`](crate::scanner::FolderScanner)
//! 2. **Filtering** - per-root results are aggregated by base name and groups
//!    below the `min_match` threshold are dropped
//! 3. **Writing** - each surviving group gets a folder under the output
//!    directory and its items are copied, deduplicated by content
//!
//! Processing is strictly sequential on the calling thread. Use
//! [`spawn_collect`] to run it on a dedicated worker and keep the caller free
//! to pause, resume or stop through the returned [`RunHandle`].
//!
//! Item-level failures are recorded in the [`RunSummary`] and never abort
//! the run. Run-level failures ([`CollectError`]) abort it; files already
//! written stay on disk.
//!
//! # Example
//!
//! ```no_run
//! use filecollect::collect::{spawn_collect, CollectConfig, Collector, ControlChannel};
//! use std::path::PathBuf;
//!
//! let config = CollectConfig::new(vec![PathBuf::from("shoot_a"), PathBuf::from("shoot_b")])
//!     .with_min_match(2)
//!     .with_output_folder_name("merged");
//!
//! let handle = spawn_collect(Collector::new(config), ControlChannel::new()).unwrap();
//! handle.control().pause();
//! handle.control().resume();
//! let summary = handle.join().unwrap();
//! println!("{} files copied", summary.files_copied);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::control::{Checkpoint, ControlChannel};
use super::events::{MergeEvent, RunState};
use super::groups::{aggregate, filter_groups, FilterStats, Group, GroupingStats, MinMatch};
use super::writer::{write_order, GroupWriter, ItemOutcome};
use crate::progress::{percent, ProgressCallback};
use crate::scanner::{FolderScanner, Hasher, ItemKind, ScanConfig, ScanError};

/// Where the top-level output directory is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLocation {
    /// Next to the first input folder (inside its parent).
    #[default]
    OriginalLocation,
    /// Inside `custom_output_path`.
    CustomLocation,
}

/// Run-level errors. Any of these aborts the whole run.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    /// No input folders were supplied.
    #[error("No input folders supplied")]
    NoInputFolders,

    /// The threshold is outside the accepted range.
    #[error("Invalid minimum match count {0} (expected {min}..={max})", min = MinMatch::MIN, max = MinMatch::MAX)]
    InvalidMinMatch(usize),

    /// Custom location was selected without a path.
    #[error("Custom output location selected but no output path given")]
    MissingCustomPath,

    /// The top-level output directory could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    CreateOutputDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A group's output directory could not be created.
    #[error("Cannot create group directory {path}: {source}")]
    CreateGroupDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The worker thread could not be started.
    #[error("Cannot start worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread panicked.
    #[error("Worker thread panicked")]
    WorkerPanicked,
}

/// Configuration for one collection run.
#[derive(Clone)]
pub struct CollectConfig {
    /// Roots to scan, in order. The first one's parent is the default output base.
    pub input_folders: Vec<PathBuf>,
    /// Minimum items per group, validated to `2..=10` when the run starts.
    pub min_match: usize,
    /// Output placement mode.
    pub output_location: OutputLocation,
    /// Output base for [`OutputLocation::CustomLocation`].
    pub custom_output_path: Option<PathBuf>,
    /// Output folder name; defaults to `collected_<YYYYMMDD_HHMMSS>`.
    pub output_folder_name: Option<String>,
    /// Scanner configuration applied to every root.
    pub scan: ScanConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for CollectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectConfig")
            .field("input_folders", &self.input_folders)
            .field("min_match", &self.min_match)
            .field("output_location", &self.output_location)
            .field("custom_output_path", &self.custom_output_path)
            .field("output_folder_name", &self.output_folder_name)
            .field("scan", &self.scan)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl CollectConfig {
    /// Create a configuration with defaults for everything but the inputs.
    #[must_use]
    pub fn new(input_folders: Vec<PathBuf>) -> Self {
        Self {
            input_folders,
            min_match: MinMatch::default().get(),
            output_location: OutputLocation::OriginalLocation,
            custom_output_path: None,
            output_folder_name: None,
            scan: ScanConfig::default(),
            progress_callback: None,
        }
    }

    /// Set the minimum match count.
    #[must_use]
    pub fn with_min_match(mut self, min_match: usize) -> Self {
        self.min_match = min_match;
        self
    }

    /// Place the output inside `path` instead of next to the first input.
    #[must_use]
    pub fn with_custom_output(mut self, path: PathBuf) -> Self {
        self.output_location = OutputLocation::CustomLocation;
        self.custom_output_path = Some(path);
        self
    }

    /// Set the output folder name.
    #[must_use]
    pub fn with_output_folder_name(mut self, name: impl Into<String>) -> Self {
        self.output_folder_name = Some(name.into());
        self
    }

    /// Set the scanner configuration.
    #[must_use]
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Resolve the top-level output directory.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::MissingCustomPath`] for a custom location
    /// without a path and [`CollectError::NoInputFolders`] when the default
    /// location has no first input to derive from.
    pub fn resolve_output_dir(&self, now: DateTime<Local>) -> Result<PathBuf, CollectError> {
        let base = match self.output_location {
            OutputLocation::CustomLocation => self
                .custom_output_path
                .clone()
                .ok_or(CollectError::MissingCustomPath)?,
            OutputLocation::OriginalLocation => {
                let first = self
                    .input_folders
                    .first()
                    .ok_or(CollectError::NoInputFolders)?;
                first
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
            }
        };

        let name = self
            .output_folder_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_output_name(now));
        Ok(base.join(name))
    }
}

/// Default output folder name for a run started at `now`.
#[must_use]
pub fn default_output_name(now: DateTime<Local>) -> String {
    format!("collected_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Groups that survived filtering, before anything is written.
#[derive(Debug, Default)]
pub struct CollectPlan {
    /// Surviving groups, in aggregation order
    pub groups: Vec<Group>,
    /// Aggregation statistics
    pub grouping: GroupingStats,
    /// Filter statistics
    pub filter: FilterStats,
    /// Non-fatal errors from scanning
    pub scan_errors: Vec<ScanError>,
}

/// How a run ended without a run-level error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every surviving group was processed.
    #[default]
    Completed,
    /// The run was stopped before finishing.
    Stopped,
    /// No group met the threshold; nothing was written.
    NoQualifyingGroups,
}

/// A failed item, as recorded in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    /// Group the item belongs to
    pub group: String,
    /// Item name
    pub name: String,
    /// Source path
    pub path: PathBuf,
    /// Error message
    pub message: String,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Top-level output directory, if it was created
    pub output_dir: Option<PathBuf>,
    /// Output directory of each group written (fully or partially)
    pub group_dirs: Vec<PathBuf>,
    /// Distinct base names found across all roots
    pub groups_found: usize,
    /// Groups dropped by the threshold
    pub groups_dropped: usize,
    /// Groups whose directory was created
    pub groups_merged: usize,
    /// Items in surviving groups
    pub total_items: usize,
    /// Items copied or skipped as duplicates
    pub processed_items: usize,
    /// Files copied
    pub files_copied: usize,
    /// Image folders copied
    pub folders_copied: usize,
    /// Files skipped because their content was already written in the group
    pub duplicates_skipped: usize,
    /// Image folders skipped because they were already copied in the group
    pub folders_skipped: usize,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Items that failed
    pub item_errors: Vec<ItemError>,
    /// Scan errors, as messages
    pub scan_errors: Vec<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Whether any item or scan entry failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.item_errors.is_empty() || !self.scan_errors.is_empty()
    }
}

/// In-flight state of one run, owned by the executing worker.
struct MergeRun<'a> {
    control: &'a ControlChannel,
    state: RunState,
    summary: RunSummary,
}

impl MergeRun<'_> {
    fn transition(&mut self, next: RunState) {
        debug_assert!(
            !self.state.is_terminal(),
            "run already ended in state {}",
            self.state
        );
        log::debug!("Run state: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Collection engine for one invocation.
#[derive(Debug)]
pub struct Collector {
    config: CollectConfig,
    hasher: Hasher,
}

impl Collector {
    /// Create a collector with the given configuration.
    #[must_use]
    pub fn new(config: CollectConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// The configuration this collector runs with.
    #[must_use]
    pub fn config(&self) -> &CollectConfig {
        &self.config
    }

    fn emit(&self, event: MergeEvent) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_event(&event);
        }
    }

    fn report_progress(&self, processed: usize, total: usize) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(percent(processed, total));
        }
    }

    /// Check inputs that make a run impossible before anything is scanned.
    fn validate(&self) -> Result<MinMatch, CollectError> {
        if self.config.input_folders.is_empty() {
            return Err(CollectError::NoInputFolders);
        }
        let min_match = MinMatch::new(self.config.min_match)
            .ok_or(CollectError::InvalidMinMatch(self.config.min_match))?;
        if self.config.output_location == OutputLocation::CustomLocation
            && self.config.custom_output_path.is_none()
        {
            return Err(CollectError::MissingCustomPath);
        }
        Ok(min_match)
    }

    /// Scan every root, aggregate and filter, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] if the configuration is invalid.
    pub fn plan(&self) -> Result<CollectPlan, CollectError> {
        let min_match = self.validate()?;
        Ok(self.build_plan(min_match))
    }

    fn build_plan(&self, min_match: MinMatch) -> CollectPlan {
        let mut scan_errors = Vec::new();
        let per_root: Vec<_> = self
            .config
            .input_folders
            .iter()
            .map(|root| {
                log::info!("Scanning {}", root.display());
                let result = FolderScanner::new(root, self.config.scan.clone()).scan();
                scan_errors.extend(result.errors);
                result.items
            })
            .collect();

        let (groups, grouping) = aggregate(per_root);
        let (groups, filter) = filter_groups(groups, min_match);
        log::info!(
            "{} of {} groups reach {} items ({} items to write)",
            filter.kept_groups,
            grouping.total_groups,
            min_match,
            filter.kept_items
        );

        CollectPlan {
            groups,
            grouping,
            filter,
            scan_errors,
        }
    }

    /// Run the full pipeline on the current thread.
    ///
    /// `control` is consulted before each group and before each item.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] for run-level failures. A
    /// [`MergeEvent::RunFailed`] event is emitted first.
    pub fn run(&self, control: &ControlChannel) -> Result<RunSummary, CollectError> {
        let start = Instant::now();
        let mut run = MergeRun {
            control,
            state: RunState::Idle,
            summary: RunSummary::default(),
        };

        match self.execute(&mut run) {
            Ok(()) => {
                run.summary.duration_ms = elapsed_ms(start);
                Ok(run.summary)
            }
            Err(e) => {
                run.transition(RunState::Failed);
                log::error!("Collection failed: {}", e);
                self.emit(MergeEvent::RunFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn execute(&self, run: &mut MergeRun<'_>) -> Result<(), CollectError> {
        let min_match = self.validate()?;
        let output_dir = self.config.resolve_output_dir(Local::now())?;

        run.transition(RunState::Scanning);
        let plan = self.build_plan(min_match);
        run.transition(RunState::Filtering);

        run.summary.groups_found = plan.grouping.total_groups;
        run.summary.groups_dropped = plan.filter.dropped_groups;
        run.summary.total_items = plan.filter.kept_items;
        run.summary.scan_errors = plan.scan_errors.iter().map(ToString::to_string).collect();

        if plan.groups.is_empty() {
            log::info!("No group reached {} items", min_match);
            run.summary.outcome = RunOutcome::NoQualifyingGroups;
            run.transition(RunState::Completed);
            self.emit(MergeEvent::NoQualifyingGroups);
            return Ok(());
        }

        fs::create_dir_all(&output_dir).map_err(|source| CollectError::CreateOutputDir {
            path: output_dir.clone(),
            source,
        })?;
        run.summary.output_dir = Some(output_dir.clone());
        self.emit(MergeEvent::OutputDirCreated {
            path: output_dir.clone(),
        });

        run.transition(RunState::Writing);
        let mut stopped = false;
        for group in &plan.groups {
            if run.control.checkpoint() == Checkpoint::Stop {
                stopped = true;
                break;
            }
            if self.write_group(run, &output_dir, group)? == Checkpoint::Stop {
                stopped = true;
                break;
            }
        }

        if stopped {
            log::info!(
                "Stopped after {} of {} items",
                run.summary.processed_items,
                run.summary.total_items
            );
            run.summary.outcome = RunOutcome::Stopped;
            run.transition(RunState::Stopped);
            self.emit(MergeEvent::Stopped);
        } else {
            run.summary.outcome = RunOutcome::Completed;
            run.transition(RunState::Completed);
            self.emit(MergeEvent::Completed {
                groups: run.summary.groups_merged,
            });
        }
        Ok(())
    }

    /// Write one group. Returns [`Checkpoint::Stop`] if a stop was observed.
    fn write_group(
        &self,
        run: &mut MergeRun<'_>,
        output_dir: &Path,
        group: &Group,
    ) -> Result<Checkpoint, CollectError> {
        let group_dir = output_dir.join(&group.base_name);
        fs::create_dir_all(&group_dir).map_err(|source| CollectError::CreateGroupDir {
            path: group_dir.clone(),
            source,
        })?;
        let mut writer = GroupWriter::new(group_dir, &self.hasher);
        run.summary.groups_merged += 1;
        run.summary.group_dirs.push(writer.group_dir().to_path_buf());
        self.emit(MergeEvent::GroupDirCreated {
            group: group.base_name.clone(),
            path: writer.group_dir().to_path_buf(),
        });

        for item in write_order(group) {
            if run.control.checkpoint() == Checkpoint::Stop {
                return Ok(Checkpoint::Stop);
            }

            let event = match writer.write_item(item) {
                Ok(outcome) => {
                    let summary = &mut run.summary;
                    summary.processed_items += 1;
                    let event = match outcome {
                        ItemOutcome::Copied { dest, bytes } => {
                            summary.files_copied += 1;
                            summary.bytes_copied += bytes;
                            if item.kind == ItemKind::RootFile {
                                MergeEvent::RootFileCopied {
                                    name: item.name.clone(),
                                    dest,
                                }
                            } else {
                                MergeEvent::SubfolderFileCopied {
                                    name: item.name.clone(),
                                    dest,
                                }
                            }
                        }
                        ItemOutcome::Duplicate => {
                            summary.duplicates_skipped += 1;
                            MergeEvent::DuplicateSkipped {
                                name: item.name.clone(),
                            }
                        }
                        ItemOutcome::FolderCopied { dest, bytes } => {
                            summary.folders_copied += 1;
                            summary.bytes_copied += bytes;
                            MergeEvent::FolderCopied {
                                name: item.name.clone(),
                                dest,
                            }
                        }
                        ItemOutcome::FolderAlreadyCopied => {
                            summary.folders_skipped += 1;
                            MergeEvent::FolderAlreadyCopied {
                                name: item.name.clone(),
                            }
                        }
                    };
                    self.report_progress(summary.processed_items, summary.total_items);
                    event
                }
                Err(e) => {
                    log::warn!("Failed to process {}: {}", item.path.display(), e);
                    run.summary.item_errors.push(ItemError {
                        group: group.base_name.clone(),
                        name: item.name.clone(),
                        path: item.path.clone(),
                        message: e.to_string(),
                    });
                    MergeEvent::ItemFailed {
                        name: item.name.clone(),
                        error: e.to_string(),
                    }
                }
            };
            self.emit(event);
        }

        Ok(Checkpoint::Continue)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Handle to a run executing on its own worker thread.
#[derive(Debug)]
pub struct RunHandle {
    control: ControlChannel,
    handle: JoinHandle<Result<RunSummary, CollectError>>,
}

impl RunHandle {
    /// The run's control channel.
    #[must_use]
    pub fn control(&self) -> &ControlChannel {
        &self.control
    }

    /// Whether the worker has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its result.
    ///
    /// # Errors
    ///
    /// Returns the run's [`CollectError`], or
    /// [`CollectError::WorkerPanicked`] if the worker panicked.
    pub fn join(self) -> Result<RunSummary, CollectError> {
        self.handle
            .join()
            .map_err(|_| CollectError::WorkerPanicked)?
    }
}

/// Run `collector` on a dedicated worker thread.
///
/// # Errors
///
/// Returns [`CollectError::Spawn`] if the thread cannot be created.
pub fn spawn_collect(collector: Collector, control: ControlChannel) -> Result<RunHandle, CollectError> {
    let worker_control = control.clone();
    let handle = thread::Builder::new()
        .name("filecollect-worker".to_string())
        .spawn(move || collector.run(&worker_control))
        .map_err(CollectError::Spawn)?;

    Ok(RunHandle { control, handle })
}
