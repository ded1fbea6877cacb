//! Result and error types for pixdiff.

use crate::image_set::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pixdiff operations
pub type PixdiffResult<T> = Result<T, PixdiffError>;

/// Errors that can occur while comparing image sets
#[derive(Debug, Error)]
pub enum PixdiffError {
    /// A glob pattern expanded to zero files
    #[error(
        "Could not find the {role} files matching '{pattern}'. Use -h argument for help on how to point the tool to {role} files."
    )]
    NoMatchingFiles {
        /// Which image set the pattern belongs to
        role: Role,
        /// The pattern as given
        pattern: String,
    },

    /// A glob pattern could not be parsed
    #[error("Invalid {role} pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Which image set the pattern belongs to
        role: Role,
        /// The pattern as given
        pattern: String,
        /// Parser message
        message: String,
    },

    /// A file could not be recognised or decoded as an image
    #[error("Cannot decode image {}: {message}", path.display())]
    Decode {
        /// File that failed
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Decoded images do not share the same shape
    #[error(
        "Image dimensions differ: source {}x{}, target {}x{}",
        source_size.0, source_size.1, target_size.0, target_size.1
    )]
    DimensionMismatch {
        /// Source width and height
        source_size: (u32, u32),
        /// Target width and height
        target_size: (u32, u32),
    },

    /// A diff artifact could not be encoded or written
    #[error("Failed to write diff artifact {}: {message}", path.display())]
    ArtifactWrite {
        /// Artifact destination
        path: PathBuf,
        /// Encoder message
        message: String,
    },

    /// The run log file could not be opened
    #[error("Failed to open run log {}: {message}", path.display())]
    LogSink {
        /// Log file path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PixdiffError {
    /// Whether the error only affects a single pair.
    ///
    /// Recoverable errors are logged and the run continues with the next
    /// pair; everything else aborts the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::DimensionMismatch { .. } | Self::ArtifactWrite { .. }
        )
    }
}
