//! filecollect - Merge same-named files from several folders
//!
//! A cross-platform Rust CLI application that groups files by base name
//! across input folders, keeps groups found in enough places, and copies
//! each group into its own output folder with content deduplication
//! (BLAKE3) and collision-free renaming.

pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, CollectArgs, Commands, OutputFormat, PlanArgs, SelectionArgs};
use crate::collect::{spawn_collect, CollectConfig, Collector, ControlChannel};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{JsonPlan, JsonRun};
use crate::progress::Progress;
use crate::scanner::{FolderPolicy, ScanConfig};

/// Global flags that apply to every subcommand.
#[derive(Debug, Clone, Copy)]
struct Globals {
    quiet: bool,
    accessible: bool,
}

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, run-level collection
/// failures, and output failures. Item-level failures are reported through
/// the returned [`ExitCode`] instead.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(Some(path))
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => Config::load(),
    };
    log::debug!("Effective config: {:?}", config);

    let globals = Globals {
        quiet: cli.quiet,
        accessible: cli.accessible || cli.no_color,
    };

    let config_file = cli.config.as_deref();
    match cli.command {
        Commands::Collect(args) => run_collect(args, &config, config_file, globals),
        Commands::Plan(args) => run_plan(&args, &config, config_file),
    }
}

/// Overlay the selection flags on the loaded config.
fn effective_config(selection: &SelectionArgs, config: &Config) -> Config {
    Config {
        min_match: selection
            .min_match
            .map_or(config.min_match, usize::from),
        image_folders: selection.image_folders || config.image_folders,
        skip_hidden: selection.skip_hidden || config.skip_hidden,
        follow_symlinks: selection.follow_symlinks || config.follow_symlinks,
        output_dir: config.output_dir.clone(),
        categories: if selection.types.is_empty() {
            config.categories.clone()
        } else {
            selection.types.clone()
        },
    }
}

/// Write `config` to the `--config` file, or the default location.
fn save_config(config: &Config, config_file: Option<&Path>) -> Result<()> {
    match config_file {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    log::info!("Saved settings to config file");
    Ok(())
}

/// Build the collection configuration for `folders` from merged settings.
fn collect_config(folders: &[PathBuf], config: &Config) -> CollectConfig {
    let folder_policy = if config.image_folders {
        FolderPolicy::ImageFolders
    } else {
        FolderPolicy::Enumerate
    };
    let scan = ScanConfig {
        follow_symlinks: config.follow_symlinks,
        skip_hidden: config.skip_hidden,
        categories: config.categories.clone(),
        folder_policy,
    };

    CollectConfig::new(folders.to_vec())
        .with_min_match(config.min_match)
        .with_scan_config(scan)
}

fn run_plan(args: &PlanArgs, config: &Config, config_file: Option<&Path>) -> Result<ExitCode> {
    let config = effective_config(&args.selection, config);
    if args.selection.save_config {
        save_config(&config, config_file)?;
    }

    let collector = Collector::new(collect_config(&args.selection.folders, &config));
    let plan = collector.plan()?;

    let exit_code = if plan.groups.is_empty() {
        ExitCode::NoGroups
    } else if plan.scan_errors.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.selection.format {
        OutputFormat::Text => output::write_plan(&plan, &mut out)?,
        OutputFormat::Json => JsonPlan::new(&plan, exit_code).write_to(&mut out, true)?,
    }
    out.flush()?;
    Ok(exit_code)
}

fn run_collect(
    args: CollectArgs,
    config: &Config,
    config_file: Option<&Path>,
    globals: Globals,
) -> Result<ExitCode> {
    let format = args.selection.format;
    let mut config = effective_config(&args.selection, config);
    if let Some(dir) = args.output_dir {
        config.output_dir = Some(dir);
    }
    if args.selection.save_config {
        save_config(&config, config_file)?;
    }

    let mut collect = collect_config(&args.selection.folders, &config);
    if let Some(dir) = config.output_dir {
        collect = collect.with_custom_output(dir);
    }
    if let Some(name) = args.name {
        collect = collect.with_output_folder_name(name);
    }

    let progress = Arc::new(Progress::with_accessible(
        globals.quiet || format == OutputFormat::Json,
        globals.accessible,
    ));
    let collect = collect.with_progress_callback(progress.clone());

    let handler = signal::install_handler()?;
    let control = ControlChannel::new();
    handler.attach(control.clone());

    let handle = spawn_collect(Collector::new(collect), control.clone())?;
    if args.interactive {
        interactive::spawn_stdin_reader(control).context("Cannot read commands from stdin")?;
    }

    let result = handle.join();
    handler.detach();
    progress.finish();
    let summary = result?;

    let exit_code = ExitCode::from_summary(&summary);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text if globals.quiet => {}
        OutputFormat::Text => output::write_summary(&summary, &mut out)?,
        OutputFormat::Json => JsonRun::new(&summary, exit_code).write_to(&mut out, true)?,
    }
    out.flush()?;
    Ok(exit_code)
}
