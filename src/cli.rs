//! Command-line interface definitions for filecollect.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Merge items shared by at least two of three folders
//! filecollect collect ~/shoot_a ~/shoot_b ~/shoot_c
//!
//! # Require three matches and write into a fixed location
//! filecollect collect a b c --min-match 3 --output-dir ~/merged --name trips
//!
//! # Show what would be merged, as JSON
//! filecollect plan a b --format json
//!
//! # Verbose mode for debugging
//! filecollect -v collect a b
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scanner::FileCategory;

/// Merge same-named files from several folders.
///
/// filecollect groups files by base name across the input folders, keeps
/// groups found at least `--min-match` times, and copies each group into
/// its own output folder, skipping identical content.
#[derive(Debug, Parser)]
#[command(name = "filecollect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Use an ASCII progress bar without color
    #[arg(long, global = true, env = "FILECOLLECT_ACCESSIBLE")]
    pub accessible: bool,

    /// Read settings from this file instead of the default config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for filecollect.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge qualifying groups into an output folder
    Collect(CollectArgs),
    /// Show qualifying groups without writing anything
    Plan(PlanArgs),
}

/// Options shared by every subcommand that scans.
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Folders to scan, in order
    #[arg(value_name = "FOLDERS", required = true, num_args = 1..)]
    pub folders: Vec<PathBuf>,

    /// Minimum number of items a group needs (2 to 10)
    #[arg(short = 'm', long, value_name = "N", value_parser = clap::value_parser!(u8).range(2..=10))]
    pub min_match: Option<u8>,

    /// Treat first-level folders holding only images as single items
    #[arg(long)]
    pub image_folders: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Only collect these categories (comma-separated)
    #[arg(short = 't', long = "types", value_enum, value_delimiter = ',', value_name = "CATS")]
    pub types: Vec<FileCategory>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Save these options as defaults in the config file
    #[arg(long)]
    pub save_config: bool,
}

/// Arguments for the collect subcommand.
#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Scan options
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Directory to create the output folder in (default: next to the first folder)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output folder name (default: collected_<timestamp>)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Read p (pause), r (resume) and s/q (stop) from stdin while running
    #[arg(short, long)]
    pub interactive: bool,
}

/// Arguments for the plan subcommand.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Scan options
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
