//! Positional pairing of source and target image lists.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A baseline image and the image compared against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePair {
    /// Baseline image
    pub source: PathBuf,
    /// Image under test
    pub target: PathBuf,
}

impl ImagePair {
    /// Create a new pair
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Baseline path
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Target path
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// The filtered source and target lists, ready to be zipped.
///
/// Pairing is purely positional: the i-th source goes with the i-th target
/// and whatever is left over in the longer list is never compared.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    sources: Vec<PathBuf>,
    targets: Vec<PathBuf>,
}

impl Pairing {
    /// Build a pairing from two already sorted lists
    #[must_use]
    pub const fn new(sources: Vec<PathBuf>, targets: Vec<PathBuf>) -> Self {
        Self { sources, targets }
    }

    /// Number of source images considered
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of target images considered
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of pairs that will be produced
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len().min(self.targets.len())
    }

    /// Whether no pairs will be produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Images in the longer list that have no counterpart
    #[must_use]
    pub fn unpaired(&self) -> &[PathBuf] {
        let n = self.len();
        if self.sources.len() > n {
            &self.sources[n..]
        } else {
            &self.targets[n..]
        }
    }

    /// Lazily enumerate pairs without consuming the lists
    pub fn pairs(&self) -> impl Iterator<Item = ImagePair> + '_ {
        self.sources
            .iter()
            .zip(&self.targets)
            .map(|(source, target)| ImagePair::new(source, target))
    }
}

impl IntoIterator for Pairing {
    type Item = ImagePair;
    type IntoIter = Pairs;

    fn into_iter(self) -> Self::IntoIter {
        Pairs {
            inner: self.sources.into_iter().zip(self.targets),
        }
    }
}

/// Owning iterator over the pairs of a [`Pairing`]
#[derive(Debug)]
pub struct Pairs {
    inner: std::iter::Zip<std::vec::IntoIter<PathBuf>, std::vec::IntoIter<PathBuf>>,
}

impl Iterator for Pairs {
    type Item = ImagePair;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(source, target)| ImagePair { source, target })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Pairs {}

/// Zip two lists positionally, truncating to the shorter one
#[must_use]
pub fn pair_images(sources: Vec<PathBuf>, targets: Vec<PathBuf>) -> Pairing {
    Pairing::new(sources, targets)
}
