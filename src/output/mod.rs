//! Output formatters for plans and run summaries.
//!
//! This module provides different output formats:
//! - Text for terminals
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use filecollect::collect::{CollectConfig, Collector, ControlChannel};
//! use filecollect::error::ExitCode;
//! use filecollect::output::JsonRun;
//! use std::path::PathBuf;
//!
//! let collector = Collector::new(CollectConfig::new(vec![PathBuf::from("a"), PathBuf::from("b")]));
//! let summary = collector.run(&ControlChannel::new()).unwrap();
//!
//! let output = JsonRun::new(&summary, ExitCode::from_summary(&summary));
//! output.write_to(&mut std::io::stdout(), true).unwrap();
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutputError, JsonPlan, JsonRun};
pub use text::{write_plan, write_summary};
