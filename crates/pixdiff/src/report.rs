//! Run reporting: console output, log events and the run summary.
//!
//! Every event is written twice: once to the terminal, styled, and once as a
//! `tracing` event that ends up in the run log.

use crate::diff::BoundingBox;
use crate::image_set::Role;
use crate::pairing::ImagePair;
use crate::result::PixdiffError;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A pair whose pixels differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchRecord {
    /// Baseline image
    pub source: PathBuf,
    /// Image under test
    pub target: PathBuf,
    /// Rectangle around the differing pixels
    pub bounding_box: BoundingBox,
    /// Number of pixels with at least one differing channel
    pub differing_pixels: usize,
    /// Artifact path, absent when writing it failed
    pub artifact: Option<PathBuf>,
}

/// A pair that could not be compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Baseline image
    pub source: PathBuf,
    /// Image under test
    pub target: PathBuf,
    /// Why the pair was skipped
    pub reason: String,
}

/// Totals for a single invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Source images considered after exclusion
    pub source_images: usize,
    /// Target images considered after exclusion
    pub target_images: usize,
    /// Pairs whose images were both decoded and compared
    pub compared: usize,
    /// Pairs with identical pixels
    pub matched: usize,
    /// Pairs with at least one differing channel
    pub mismatches: Vec<MismatchRecord>,
    /// Pairs skipped because of a decode failure
    pub skipped: Vec<SkippedRecord>,
}

impl RunSummary {
    /// Number of mismatched pairs
    #[must_use]
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    /// Number of skipped pairs
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether every compared pair matched
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Accumulates a [`RunSummary`] and emits per-pair events
#[derive(Debug)]
pub struct RunReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    use_color: bool,
    quiet: bool,
    verbose: bool,
    summary: RunSummary,
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl RunReporter {
    /// Create a reporter writing to stderr
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
            verbose: false,
            summary: RunSummary::default(),
        }
    }

    /// Print detail lines: mismatch regions and unpaired paths.
    ///
    /// Ignored in quiet mode.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Record the image counts and announce them
    pub fn begin(&mut self, source_images: usize, target_images: usize) {
        self.summary.source_images = source_images;
        self.summary.target_images = target_images;

        let message =
            format!("{source_images} benchmark image(s), {target_images} target image(s).");
        tracing::info!("{message}");
        self.info(&message);
    }

    /// Warn that the longer list has images that will never be compared
    pub fn unpaired(&self, longer: Role, unpaired: &[PathBuf]) {
        if unpaired.is_empty() {
            return;
        }
        let message = format!(
            "{} {longer} image(s) have no counterpart and will not be compared",
            unpaired.len()
        );
        tracing::warn!("{message}");
        self.warning(&message);
        for path in unpaired {
            tracing::debug!(path = %path.display(), "unpaired {longer} image");
            if self.verbose {
                self.detail(&format!("unpaired: {}", path.display()));
            }
        }
    }

    /// Show a progress bar over `total` pairs.
    ///
    /// Only shown on an interactive terminal; a hidden bar would swallow
    /// the per-pair lines.
    pub fn start_progress(&mut self, total: u64) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message("comparing");
        self.progress_bar = Some(pb);
    }

    /// Both images decoded and no pixel differs
    pub fn matched(&mut self, pair: &ImagePair) {
        self.summary.compared += 1;
        self.summary.matched += 1;

        let message = format!(
            "{} matches {}",
            pair.target().display(),
            pair.source().display()
        );
        tracing::info!("{message}");
        self.success(&message);
        self.tick();
    }

    /// At least one pixel differs
    pub fn mismatch(
        &mut self,
        pair: &ImagePair,
        bounding_box: BoundingBox,
        differing_pixels: usize,
        artifact: Option<&Path>,
    ) {
        self.summary.compared += 1;
        self.summary.mismatches.push(MismatchRecord {
            source: pair.source.clone(),
            target: pair.target.clone(),
            bounding_box,
            differing_pixels,
            artifact: artifact.map(Path::to_path_buf),
        });

        let message = format!(
            "{} DOES NOT match {}",
            pair.target().display(),
            pair.source().display()
        );
        tracing::warn!("{message}");
        self.failure(&message);
        if self.verbose {
            self.detail(&format!(
                "{}x{} region at ({}, {}), {differing_pixels} differing pixel(s)",
                bounding_box.width(),
                bounding_box.height(),
                bounding_box.left,
                bounding_box.top
            ));
        }
        if let Some(artifact) = artifact {
            tracing::info!("Saved diff to {}", artifact.display());
            self.detail(&format!("diff saved to {}", artifact.display()));
        }
        self.tick();
    }

    /// The pair was skipped
    pub fn skipped(&mut self, pair: &ImagePair, error: &PixdiffError) {
        self.summary.skipped.push(SkippedRecord {
            source: pair.source.clone(),
            target: pair.target.clone(),
            reason: error.to_string(),
        });

        let message = format!(
            "Cannot process image {} or {}: {error}",
            pair.source().display(),
            pair.target().display()
        );
        tracing::error!("{message}");
        self.error(&message);
        self.tick();
    }

    /// A mismatch was found but its artifact could not be saved
    pub fn artifact_failed(&self, error: &PixdiffError) {
        tracing::error!("{error}");
        self.error(&error.to_string());
    }

    /// Close the progress bar, emit totals and hand back the summary
    pub fn finish(mut self) -> RunSummary {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }

        let s = &self.summary;
        let message = format!(
            "Compared {} pair(s) from {} source and {} target image(s): {} matched, {} mismatched, {} skipped.",
            s.compared,
            s.source_images,
            s.target_images,
            s.matched,
            s.mismatch_count(),
            s.skipped_count()
        );
        tracing::info!("{message}");
        self.info(&message);

        self.summary
    }

    fn tick(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(line),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    // Mismatches and errors print even in quiet mode.
    fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    fn error(&self, message: &str) {
        let prefix = if self.use_color {
            style("!").red().bold().to_string()
        } else {
            "ERROR".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    fn detail(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.use_color {
            style(format!("  {message}")).dim().to_string()
        } else {
            format!("  {message}")
        };
        self.write_line(&line);
    }
}
