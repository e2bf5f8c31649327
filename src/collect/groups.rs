//! Cross-root grouping and threshold filtering.
//!
//! # Overview
//!
//! Each root is scanned independently into a flat list of [`FileItem`]s.
//! [`aggregate`] then unions those lists into [`Group`]s keyed by the
//! derived base name, and [`filter_groups`] drops groups that are too small
//! to be worth merging.
//!
//! No deduplication happens here: identical content coming from several
//! roots stays in the group and is resolved by content hash when the group
//! is written.
//!
//! # Example
//!
//! ```
//! use filecollect::collect::{aggregate, filter_groups, MinMatch};
//! use filecollect::scanner::FileItem;
//! use std::path::PathBuf;
//!
//! let root_a = vec![FileItem::root_file(PathBuf::from("/a/report.pdf"), "report.pdf")];
//! let root_b = vec![
//!     FileItem::root_file(PathBuf::from("/b/report.pdf"), "report.pdf"),
//!     FileItem::root_file(PathBuf::from("/b/misc.txt"), "misc.txt"),
//! ];
//!
//! let (groups, stats) = aggregate(vec![root_a, root_b]);
//! assert_eq!(stats.total_groups, 2);
//!
//! let (kept, filter_stats) = filter_groups(groups, MinMatch::default());
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].base_name, "report");
//! assert_eq!(filter_stats.dropped_groups, 1);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scanner::FileItem;

/// All items sharing one base name, across every scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Grouping key, also used as the group's output folder name
    pub base_name: String,
    /// Items in root order, then scan order within each root
    pub items: Vec<FileItem>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            items: Vec::new(),
        }
    }

    /// Number of items in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Minimum number of items a group needs to be written (2 to 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MinMatch(u8);

impl MinMatch {
    /// Smallest accepted threshold.
    pub const MIN: u8 = 2;
    /// Largest accepted threshold.
    pub const MAX: u8 = 10;

    /// Validate a threshold.
    ///
    /// Returns `None` when `value` is outside `2..=10`.
    #[must_use]
    pub fn new(value: usize) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
    }

    /// The threshold as a count.
    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for MinMatch {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl std::fmt::Display for MinMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Statistics from aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Number of per-root item lists aggregated
    pub roots: usize,
    /// Total items across all roots
    pub total_items: usize,
    /// Number of distinct base names
    pub total_groups: usize,
}

/// Statistics from threshold filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Groups that met the threshold
    pub kept_groups: usize,
    /// Groups dropped for being below the threshold
    pub dropped_groups: usize,
    /// Items in the kept groups; the progress denominator
    pub kept_items: usize,
}

/// Union per-root scan results into groups keyed by base name.
///
/// Groups appear in the order their base name was first seen, and items
/// keep root order, so the result is deterministic for a given input.
pub fn aggregate<I>(roots: I) -> (Vec<Group>, GroupingStats)
where
    I: IntoIterator<Item = Vec<FileItem>>,
{
    let mut stats = GroupingStats::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for items in roots {
        stats.roots += 1;
        stats.total_items += items.len();

        for item in items {
            let key = item.base_name();
            let slot = *index.entry(key).or_insert_with_key(|key| {
                groups.push(Group::new(key.clone()));
                groups.len() - 1
            });
            groups[slot].items.push(item);
        }
    }

    stats.total_groups = groups.len();
    log::debug!(
        "Aggregated {} items from {} roots into {} groups",
        stats.total_items,
        stats.roots,
        stats.total_groups
    );
    (groups, stats)
}

/// Keep only groups with at least `min_match` items.
pub fn filter_groups(groups: Vec<Group>, min_match: MinMatch) -> (Vec<Group>, FilterStats) {
    let mut stats = FilterStats::default();

    let kept: Vec<Group> = groups
        .into_iter()
        .filter(|group| {
            if group.len() >= min_match.get() {
                true
            } else {
                log::debug!(
                    "Dropping group '{}' ({} < {} items)",
                    group.base_name,
                    group.len(),
                    min_match
                );
                stats.dropped_groups += 1;
                false
            }
        })
        .collect();

    stats.kept_groups = kept.len();
    stats.kept_items = kept.iter().map(Group::len).sum();
    (kept, stats)
}
