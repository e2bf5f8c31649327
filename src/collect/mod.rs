//! File collection: grouping, deduplication and merging.
//!
//! # Overview
//!
//! A run goes through three phases:
//!
//! 1. **Grouping** ([`groups`]): per-root scan results are unioned by base
//!    name and filtered by the `min_match` threshold
//! 2. **Ordering** ([`natural`], [`writer::write_order`]): root files first,
//!    then everything else, each in natural order
//! 3. **Writing** ([`writer`], [`naming`]): items are copied into one folder
//!    per group, skipping content already written to that group and
//!    resolving name collisions with `_N` suffixes
//!
//! [`engine`] drives the phases, consults the [`ControlChannel`] between
//! items and reports [`MergeEvent`]s to an optional
//! [`ProgressCallback`](crate::progress::ProgressCallback).

pub mod control;
pub mod engine;
pub mod events;
pub mod groups;
pub mod naming;
pub mod natural;
pub mod writer;

pub use control::{Checkpoint, ControlChannel};
pub use engine::{
    default_output_name, spawn_collect, CollectConfig, CollectError, CollectPlan, Collector,
    ItemError, OutputLocation, RunHandle, RunOutcome, RunSummary,
};
pub use events::{MergeEvent, RunState};
pub use groups::{aggregate, filter_groups, FilterStats, Group, GroupingStats, MinMatch};
pub use naming::{next_free_dir, next_free_name};
pub use natural::natural_cmp;
pub use writer::{write_order, GroupWriter, ItemOutcome, WriteError};
