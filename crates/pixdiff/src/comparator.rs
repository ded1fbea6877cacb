//! The comparison pipeline.
//!
//! ```text
//! resolve(source) ─┐
//!                  ├─► exclude ─► pair ─► per pair: load ─► diff ─► [write artifact] ─► report
//! resolve(target) ─┘
//! ```

use crate::artifact::{ArtifactFormat, ArtifactWriter};
use crate::diff::{compute_difference, BoundingBox, DifferenceResult};
use crate::image_set::{ImageSetSpec, Role};
use crate::loader::{FileDecoder, ImageDecoder};
use crate::pairing::{pair_images, ImagePair, Pairing};
use crate::report::{RunReporter, RunSummary};
use crate::result::{PixdiffError, PixdiffResult};
use std::path::{Path, PathBuf};

/// Default baseline pattern
pub const DEFAULT_SOURCE_PATTERN: &str = "./source/*.*";

/// Default target pattern
pub const DEFAULT_TARGET_PATTERN: &str = "./target/*.*";

/// Default artifact directory
pub const DEFAULT_OUTPUT_DIR: &str = "diff";

/// Everything a run needs to know
#[derive(Debug, Clone)]
pub struct ComparatorConfig {
    source: ImageSetSpec,
    target: ImageSetSpec,
    output_dir: PathBuf,
    artifact_format: ArtifactFormat,
    warn_on_count_mismatch: bool,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_PATTERN, DEFAULT_TARGET_PATTERN)
    }
}

impl ComparatorConfig {
    /// Compare files matching `source_pattern` against `target_pattern`
    #[must_use]
    pub fn new(source_pattern: impl Into<String>, target_pattern: impl Into<String>) -> Self {
        Self {
            source: ImageSetSpec::new(Role::Source, source_pattern),
            target: ImageSetSpec::new(Role::Target, target_pattern),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            artifact_format: ArtifactFormat::default(),
            warn_on_count_mismatch: true,
        }
    }

    /// Exclude files whose name contains `exclusion`, on both sides
    #[must_use]
    pub fn with_exclusion(mut self, exclusion: &str) -> Self {
        self.source = self.source.with_exclusion(exclusion);
        self.target = self.target.with_exclusion(exclusion);
        self
    }

    /// Set the artifact directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the artifact encoding
    #[must_use]
    pub const fn with_artifact_format(mut self, format: ArtifactFormat) -> Self {
        self.artifact_format = format;
        self
    }

    /// Toggle the warning about images left unpaired
    #[must_use]
    pub const fn with_count_mismatch_warning(mut self, enabled: bool) -> Self {
        self.warn_on_count_mismatch = enabled;
        self
    }

    /// Baseline set
    #[must_use]
    pub const fn source(&self) -> &ImageSetSpec {
        &self.source
    }

    /// Target set
    #[must_use]
    pub const fn target(&self) -> &ImageSetSpec {
        &self.target
    }

    /// Artifact directory
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Artifact encoding
    #[must_use]
    pub const fn artifact_format(&self) -> ArtifactFormat {
        self.artifact_format
    }
}

/// What happened to one pair
#[derive(Debug)]
pub enum PairOutcome {
    /// Pixel-identical
    Match,
    /// Pixels differ
    Mismatch {
        /// Rectangle around the differing pixels
        bounding_box: BoundingBox,
        /// Number of pixels with a non-zero delta
        differing_pixels: usize,
        /// Where the diff was saved
        artifact: PixdiffResult<PathBuf>,
    },
    /// Not compared
    Skipped(PixdiffError),
}

/// Runs the resolve, pair, compare and write pipeline
#[derive(Debug, Clone)]
pub struct Comparator<D = FileDecoder> {
    config: ComparatorConfig,
    decoder: D,
    writer: ArtifactWriter,
}

impl Comparator<FileDecoder> {
    /// Create a comparator using the `image`-backed decoder
    #[must_use]
    pub fn new(config: ComparatorConfig) -> Self {
        Self::with_decoder(config, FileDecoder)
    }
}

impl<D: ImageDecoder> Comparator<D> {
    /// Create a comparator with a custom decoder
    #[must_use]
    pub fn with_decoder(config: ComparatorConfig, decoder: D) -> Self {
        let writer = ArtifactWriter::new(config.output_dir()).with_format(config.artifact_format());
        Self {
            config,
            decoder,
            writer,
        }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Resolve both image sets and pair them.
    ///
    /// # Errors
    ///
    /// Fails when either pattern is invalid or matches nothing. Both
    /// patterns are resolved before exclusion is applied.
    pub fn collect_pairs(&self) -> PixdiffResult<Pairing> {
        let sources = self.config.source.resolve()?;
        let targets = self.config.target.resolve()?;
        Ok(pair_images(sources, targets))
    }

    /// Decode both images of `pair` and diff them.
    ///
    /// # Errors
    ///
    /// Returns a recoverable error when either image cannot be decoded or
    /// the two have different dimensions.
    pub fn compare_pair(&self, pair: &ImagePair) -> PixdiffResult<DifferenceResult> {
        let source = self.decoder.decode(pair.source())?;
        let target = self.decoder.decode(pair.target())?;
        compute_difference(&source, &target)
    }

    /// Compare one pair and write its artifact if it mismatches
    pub fn process_pair(&self, pair: &ImagePair) -> PairOutcome {
        match self.compare_pair(pair) {
            Ok(DifferenceResult::NoDifference) => PairOutcome::Match,
            Ok(DifferenceResult::Difference {
                bounding_box,
                differing_pixels,
                diff,
            }) => {
                tracing::debug!(
                    source = %pair.source().display(),
                    target = %pair.target().display(),
                    differing_pixels,
                    ?bounding_box,
                    "pixel mismatch"
                );
                PairOutcome::Mismatch {
                    bounding_box,
                    differing_pixels,
                    artifact: self.writer.write(pair, &diff),
                }
            }
            Err(e) => PairOutcome::Skipped(e),
        }
    }

    /// Run the whole pipeline, reporting through `reporter`.
    ///
    /// The artifact directory must exist. Per-pair failures are reported and
    /// skipped; only resolution failures abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`PixdiffError::NoMatchingFiles`] or
    /// [`PixdiffError::InvalidPattern`] before any pair is processed.
    pub fn run(&self, mut reporter: RunReporter) -> PixdiffResult<RunSummary> {
        let pairing = self.collect_pairs()?;
        reporter.begin(pairing.source_count(), pairing.target_count());

        if self.config.warn_on_count_mismatch {
            let longer = if pairing.source_count() > pairing.target_count() {
                Role::Source
            } else {
                Role::Target
            };
            reporter.unpaired(longer, pairing.unpaired());
        }

        reporter.start_progress(pairing.len() as u64);
        for pair in pairing {
            match self.process_pair(&pair) {
                PairOutcome::Match => reporter.matched(&pair),
                PairOutcome::Mismatch {
                    bounding_box,
                    differing_pixels,
                    artifact,
                } => {
                    let artifact = artifact
                        .map_err(|e| reporter.artifact_failed(&e))
                        .ok();
                    reporter.mismatch(
                        &pair,
                        bounding_box,
                        differing_pixels,
                        artifact.as_deref(),
                    );
                }
                PairOutcome::Skipped(e) => reporter.skipped(&pair, &e),
            }
        }

        Ok(reporter.finish())
    }
}
