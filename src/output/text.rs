//! Human-readable output for plans and run summaries.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::collect::{write_order, CollectPlan, RunOutcome, RunSummary};

/// Print the qualifying groups of a plan, one block per group.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_plan<W: Write>(plan: &CollectPlan, writer: &mut W) -> io::Result<()> {
    for group in &plan.groups {
        writeln!(writer, "{} ({} items)", group.base_name, group.len())?;
        for item in write_order(group) {
            writeln!(writer, "  [{}] {}", item.kind, item.path.display())?;
        }
    }

    writeln!(
        writer,
        "{} of {} groups qualify, {} items from {} folders",
        plan.filter.kept_groups,
        plan.grouping.total_groups,
        plan.filter.kept_items,
        plan.grouping.roots
    )?;
    for error in &plan.scan_errors {
        writeln!(writer, "warning: {error}")?;
    }
    Ok(())
}

/// Print the summary of a finished run.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary<W: Write>(summary: &RunSummary, writer: &mut W) -> io::Result<()> {
    let headline = match summary.outcome {
        RunOutcome::Completed => "Collection complete",
        RunOutcome::Stopped => "Collection stopped",
        RunOutcome::NoQualifyingGroups => "No qualifying groups found",
    };
    writeln!(writer, "{headline}")?;

    if let Some(ref dir) = summary.output_dir {
        writeln!(writer, "  Output:      {}", dir.display())?;
    }
    writeln!(
        writer,
        "  Groups:      {} merged, {} dropped, {} found",
        summary.groups_merged, summary.groups_dropped, summary.groups_found
    )?;
    writeln!(
        writer,
        "  Items:       {} of {} processed",
        summary.processed_items, summary.total_items
    )?;
    writeln!(
        writer,
        "  Copied:      {} files, {} folders ({})",
        summary.files_copied,
        summary.folders_copied,
        ByteSize::b(summary.bytes_copied)
    )?;
    writeln!(
        writer,
        "  Skipped:     {} duplicates, {} folders already copied",
        summary.duplicates_skipped, summary.folders_skipped
    )?;

    if summary.has_errors() {
        writeln!(
            writer,
            "  Errors:      {} items, {} scan entries",
            summary.item_errors.len(),
            summary.scan_errors.len()
        )?;
        for error in &summary.item_errors {
            writeln!(writer, "    {}: {}", error.path.display(), error.message)?;
        }
        for error in &summary.scan_errors {
            writeln!(writer, "    {error}")?;
        }
    }
    Ok(())
}
