//! Image set resolution: glob expansion and name exclusion.

use crate::result::{PixdiffError, PixdiffResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which side of the comparison an image set is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Trusted baseline images
    Source,
    /// Images under test
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// A glob pattern plus the role it plays and an optional exclusion substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetSpec {
    pattern: String,
    role: Role,
    exclusion: Option<String>,
}

impl ImageSetSpec {
    /// Create a spec with no exclusion
    #[must_use]
    pub fn new(role: Role, pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            role,
            exclusion: None,
        }
    }

    /// Set the exclusion substring. An empty string disables exclusion.
    #[must_use]
    pub fn with_exclusion(mut self, exclusion: impl Into<String>) -> Self {
        let exclusion = exclusion.into();
        self.exclusion = if exclusion.is_empty() {
            None
        } else {
            Some(exclusion)
        };
        self
    }

    /// The glob pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The role tag
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The exclusion substring, if any
    #[must_use]
    pub fn exclusion(&self) -> Option<&str> {
        self.exclusion.as_deref()
    }

    /// Resolve the pattern and apply the exclusion filter.
    ///
    /// An empty expansion is fatal; a list emptied by the exclusion is not.
    pub fn resolve(&self) -> PixdiffResult<Vec<PathBuf>> {
        let paths = resolve_pattern(&self.pattern, self.role)?;
        Ok(exclude_paths(paths, self.exclusion().unwrap_or_default()))
    }
}

/// Expand a glob pattern into a lexicographically sorted list of files.
///
/// # Errors
///
/// Returns [`PixdiffError::NoMatchingFiles`] when nothing matches and
/// [`PixdiffError::InvalidPattern`] when the pattern cannot be parsed.
pub fn resolve_pattern(pattern: &str, role: Role) -> PixdiffResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| PixdiffError::InvalidPattern {
        role,
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(%role, error = %e, "skipping unreadable glob entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    if paths.is_empty() {
        return Err(PixdiffError::NoMatchingFiles {
            role,
            pattern: pattern.to_string(),
        });
    }

    // Whole-string order, not per-component: `v1.1/x` sorts before `v1/x`.
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    tracing::debug!(%role, pattern, count = paths.len(), "resolved image set");
    Ok(paths)
}

/// Drop every path whose name contains `exclusion` as a literal substring.
///
/// Order is preserved. An empty `exclusion` returns the input unchanged.
#[must_use]
pub fn exclude_paths(paths: Vec<PathBuf>, exclusion: &str) -> Vec<PathBuf> {
    if exclusion.is_empty() {
        return paths;
    }
    paths
        .into_iter()
        .filter(|path| !path_contains(path, exclusion))
        .collect()
}

fn path_contains(path: &Path, needle: &str) -> bool {
    path.to_string_lossy().contains(needle)
}
