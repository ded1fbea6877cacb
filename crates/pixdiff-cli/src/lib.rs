//! pixdiff CLI library
//!
//! Argument parsing, directory upkeep and the run driver behind the
//! `pixdiff` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod housekeeping;
mod runner;

pub use commands::{Cli, ColorArg, SummaryFormat};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use runner::{build_comparator_config, build_config, RunStatus, Runner};
