//! pixdiff: pixel-exact visual regression between two screenshot sets.
//!
//! A run resolves a baseline ("source") and a "target" glob pattern, pairs
//! the sorted results by position, and checks every pair for any channel
//! difference at all. Each mismatching pair gets a full-size difference image
//! in the output directory.
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌──────────┐   ┌────────────┐   ┌──────────┐
//! │ image_set    │──►│ pairing   │──►│ loader   │──►│ diff       │──►│ artifact │
//! │ glob+exclude │   │ zip       │   │ → RGB8   │   │ |a-b|,bbox │   │ diff_*   │
//! └──────────────┘   └───────────┘   └──────────┘   └────────────┘   └──────────┘
//!                                                          │
//!                                                          ▼
//!                                                    report + run_log
//! ```
//!
//! ```no_run
//! use pixdiff::{Comparator, ComparatorConfig, RunLog, RunReporter};
//!
//! let _log = RunLog::create("logs")?;
//! let config = ComparatorConfig::new("baseline/*.png", "current/*.png").with_exclusion("_nc");
//! let summary = Comparator::new(config).run(RunReporter::default())?;
//! println!("{} mismatch(es)", summary.mismatch_count());
//! # Ok::<(), pixdiff::PixdiffError>(())
//! ```

#![warn(missing_docs)]

pub mod artifact;
pub mod comparator;
pub mod diff;
pub mod image_set;
pub mod loader;
pub mod pairing;
pub mod report;
mod result;
pub mod run_log;

pub use artifact::{artifact_name, ArtifactFormat, ArtifactWriter};
pub use comparator::{
    Comparator, ComparatorConfig, PairOutcome, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_PATTERN,
    DEFAULT_TARGET_PATTERN,
};
pub use diff::{compute_difference, BoundingBox, DifferenceResult};
pub use image_set::{exclude_paths, resolve_pattern, ImageSetSpec, Role};
pub use loader::{FileDecoder, ImageDecoder, PixelBuffer};
pub use pairing::{pair_images, ImagePair, Pairing};
pub use report::{MismatchRecord, RunReporter, RunSummary, SkippedRecord};
pub use result::{PixdiffError, PixdiffResult};
pub use run_log::{delete_old_logs, RunLog, RunLogBuilder};
