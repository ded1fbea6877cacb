//! Diff artifact naming and persistence.

use crate::loader::PixelBuffer;
use crate::pairing::ImagePair;
use crate::result::{PixdiffError, PixdiffResult};
use image::ImageFormat;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Prefix shared by every artifact file name
pub const ARTIFACT_PREFIX: &str = "diff_";

/// Encoding used for artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactFormat {
    /// Encode in whatever format the derived file name's extension names
    #[default]
    SameAsInput,
    /// Append `.gif` to the derived name and encode as GIF
    Gif,
}

/// Derive the artifact file name for a pair.
///
/// Same basenames give `diff_<basename>`; different ones give
/// `diff_<source stem>_vs_<target basename>`.
#[must_use]
pub fn artifact_name(source: &Path, target: &Path) -> String {
    let source_name = lossy(source.file_name());
    let target_name = lossy(target.file_name());
    if source_name == target_name {
        format!("{ARTIFACT_PREFIX}{source_name}")
    } else {
        let stem = lossy(source.file_stem());
        format!("{ARTIFACT_PREFIX}{stem}_vs_{target_name}")
    }
}

fn lossy(part: Option<&OsStr>) -> String {
    part.map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Writes full-size difference buffers into an output directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    format: ArtifactFormat,
}

impl ArtifactWriter {
    /// Create a writer targeting `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ArtifactFormat::default(),
        }
    }

    /// Set the artifact encoding
    #[must_use]
    pub const fn with_format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }

    /// Output directory
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the artifact for `pair` will be written
    #[must_use]
    pub fn artifact_path(&self, pair: &ImagePair) -> PathBuf {
        let mut name = artifact_name(pair.source(), pair.target());
        if self.format == ArtifactFormat::Gif {
            name.push_str(".gif");
        }
        self.output_dir.join(name)
    }

    /// Persist `diff` for `pair`, replacing any previous artifact of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`PixdiffError::ArtifactWrite`] when the extension has no
    /// encoder or the file cannot be written.
    pub fn write(&self, pair: &ImagePair, diff: &PixelBuffer) -> PixdiffResult<PathBuf> {
        let path = self.artifact_path(pair);
        let write_err = |message: String| PixdiffError::ArtifactWrite {
            path: path.clone(),
            message,
        };

        let format = match self.format {
            ArtifactFormat::Gif => ImageFormat::Gif,
            ArtifactFormat::SameAsInput => {
                ImageFormat::from_path(&path).map_err(|e| write_err(e.to_string()))?
            }
        };
        if !format.writing_enabled() {
            return Err(write_err(format!("no encoder for {format:?}")));
        }

        diff.as_image()
            .save_with_format(&path, format)
            .map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(artifact = %path.display(), ?format, "wrote diff artifact");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_same_basename() {
        let name = artifact_name(Path::new("source/shot1.png"), Path::new("target/shot1.png"));
        assert_eq!(name, "diff_shot1.png");
    }

    #[test]
    fn test_name_different_basename() {
        let name = artifact_name(
            Path::new("source/shot1.png"),
            Path::new("target/shot1_retry.png"),
        );
        assert_eq!(name, "diff_shot1_vs_shot1_retry.png");
    }

    #[test]
    fn test_name_uses_full_stem() {
        let name = artifact_name(Path::new("a/home.page.jpeg"), Path::new("b/home.png"));
        assert_eq!(name, "diff_home.page_vs_home.png");
    }

    #[test]
    fn test_gif_format_appends_extension() {
        let writer = ArtifactWriter::new("out").with_format(ArtifactFormat::Gif);
        let pair = ImagePair::new("s/one.png", "t/one.png");
        assert_eq!(
            writer.artifact_path(&pair),
            PathBuf::from("out/diff_one.png.gif")
        );
    }

    #[test]
    fn test_write_full_size_png() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let pair = ImagePair::new("s/shot1.png", "t/shot1_retry.png");
        let mut diff = PixelBuffer::filled(6, 4, [0, 0, 0]);
        diff.set(2, 1, [0, 0, 7]);

        let path = writer.write(&pair, &diff).unwrap();

        assert_eq!(path, dir.path().join("diff_shot1_vs_shot1_retry.png"));
        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (6, 4));
        assert_eq!(written.get_pixel(2, 1).0, [0, 0, 7]);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let pair = ImagePair::new("s/a.png", "t/a.png");

        writer.write(&pair, &PixelBuffer::filled(1, 1, [1, 1, 1])).unwrap();
        let path = writer
            .write(&pair, &PixelBuffer::filled(2, 2, [2, 2, 2]))
            .unwrap();

        assert_eq!(image::open(path).unwrap().to_rgb8().dimensions(), (2, 2));
    }

    #[test]
    fn test_write_gif() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path()).with_format(ArtifactFormat::Gif);
        let pair = ImagePair::new("s/a.png", "t/a.png");

        let path = writer
            .write(&pair, &PixelBuffer::filled(3, 3, [0, 0, 0]))
            .unwrap();

        assert!(path.ends_with("diff_a.png.gif"));
        assert_eq!(image::open(path).unwrap().to_rgb8().dimensions(), (3, 3));
    }

    #[test]
    fn test_write_unknown_extension_fails() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let pair = ImagePair::new("s/a.shot", "t/a.shot");

        let err = writer
            .write(&pair, &PixelBuffer::filled(1, 1, [0, 0, 0]))
            .unwrap_err();

        assert!(matches!(err, PixdiffError::ArtifactWrite { .. }));
        assert!(err.is_recoverable());
    }
}
