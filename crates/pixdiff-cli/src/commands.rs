//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use pixdiff::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_PATTERN, DEFAULT_TARGET_PATTERN};
use std::path::PathBuf;

/// pixdiff: compare baseline screenshots against target screenshots pixel by pixel
///
/// Files matched by SOURCE are the originals, known to be correct. Files
/// matched by TARGET are compared against them in sorted order. Every pair
/// that differs in any pixel gets a difference image in the output directory.
#[derive(Parser, Debug)]
#[command(name = "pixdiff")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Glob pattern for the baseline images, e.g. 'source/*.png'
    #[arg(default_value = DEFAULT_SOURCE_PATTERN)]
    pub source: String,

    /// Glob pattern for the images under test, e.g. 'target/*.png'
    #[arg(default_value = DEFAULT_TARGET_PATTERN)]
    pub target: String,

    /// Skip files whose name contains this text (no wildcards), e.g. '_nc.gif'
    #[arg(short = 'x', long, default_value = "")]
    pub exclude: String,

    /// Directory for difference images
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Directory for run logs
    #[arg(long, default_value = "logs", env = "PIXDIFF_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Delete previously generated log files before the run
    #[arg(short = 'l', long = "logdelete")]
    pub log_delete: bool,

    /// Keep existing files in the output directory instead of clearing it
    #[arg(long)]
    pub keep_diffs: bool,

    /// Save difference images as GIF
    #[arg(long)]
    pub gif: bool,

    /// Summary output format
    #[arg(long, default_value = "text")]
    pub format: SummaryFormat,

    /// Exit with status 2 when any pair mismatches
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only mismatches and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

/// Final summary rendering
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Human-readable line
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
