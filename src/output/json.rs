//! JSON output for plans and run summaries.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! `filecollect plan --format json`:
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "base_name": "report",
//!       "items": [
//!         { "path": "/a/report.pdf", "name": "report.pdf", "kind": "root_file" }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "roots": 2,
//!     "total_items": 7,
//!     "total_groups": 4,
//!     "kept_groups": 1,
//!     "dropped_groups": 3,
//!     "kept_items": 2,
//!     "scan_errors": [],
//!     "exit_code": 0,
//!     "exit_code_name": "FC000"
//!   }
//! }
//! ```
//!
//! `filecollect collect --format json` prints the [`RunSummary`] fields plus
//! `exit_code` and `exit_code_name`.

use std::io::Write;

use serde::Serialize;

use crate::collect::{CollectPlan, Group, RunSummary};
use crate::error::ExitCode;
use crate::scanner::{FileItem, ItemKind};

/// A single item in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonItem {
    /// Source path
    pub path: String,
    /// Entry name
    pub name: String,
    /// How the item is written
    pub kind: ItemKind,
}

impl From<&FileItem> for JsonItem {
    fn from(item: &FileItem) -> Self {
        Self {
            path: item.path.to_string_lossy().into_owned(),
            name: item.name.clone(),
            kind: item.kind,
        }
    }
}

/// A group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Grouping key and output folder name
    pub base_name: String,
    /// Items in aggregation order
    pub items: Vec<JsonItem>,
}

impl From<&Group> for JsonGroup {
    fn from(group: &Group) -> Self {
        Self {
            base_name: group.base_name.clone(),
            items: group.items.iter().map(JsonItem::from).collect(),
        }
    }
}

/// Plan statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPlanSummary {
    /// Number of roots scanned
    pub roots: usize,
    /// Items found across all roots
    pub total_items: usize,
    /// Distinct base names
    pub total_groups: usize,
    /// Groups meeting the threshold
    pub kept_groups: usize,
    /// Groups below the threshold
    pub dropped_groups: usize,
    /// Items in kept groups
    pub kept_items: usize,
    /// Scan errors, as messages
    pub scan_errors: Vec<String>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FC000")
    pub exit_code_name: String,
}

/// Complete JSON output for a plan.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPlan {
    /// Qualifying groups
    pub groups: Vec<JsonGroup>,
    /// Statistics
    pub summary: JsonPlanSummary,
}

impl JsonPlan {
    /// Build the JSON view of a plan.
    #[must_use]
    pub fn new(plan: &CollectPlan, exit_code: ExitCode) -> Self {
        Self {
            groups: plan.groups.iter().map(JsonGroup::from).collect(),
            summary: JsonPlanSummary {
                roots: plan.grouping.roots,
                total_items: plan.grouping.total_items,
                total_groups: plan.grouping.total_groups,
                kept_groups: plan.filter.kept_groups,
                dropped_groups: plan.filter.dropped_groups,
                kept_items: plan.filter.kept_items,
                scan_errors: plan.scan_errors.iter().map(ToString::to_string).collect(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

/// Complete JSON output for a collection run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRun<'a> {
    /// Run summary fields
    #[serde(flatten)]
    pub summary: &'a RunSummary,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name
    pub exit_code_name: &'static str,
}

impl<'a> JsonRun<'a> {
    /// Build the JSON view of a run summary.
    #[must_use]
    pub fn new(summary: &'a RunSummary, exit_code: ExitCode) -> Self {
        Self {
            summary,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

fn write_json<T: Serialize, W: Write>(
    value: &T,
    writer: &mut W,
    pretty: bool,
) -> Result<(), JsonOutputError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
