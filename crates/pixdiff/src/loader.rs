//! Image loading into the canonical 8-bit RGB representation.
//!
//! Format detection is done by content sniffing, so a PNG saved with a
//! `.gif` extension still decodes. Alpha and any extra channels are dropped.

use crate::result::{PixdiffError, PixdiffResult};
use image::{ImageReader, Rgb, RgbImage};
use std::path::Path;

/// Row-major width x height x 3 buffer of 8-bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbImage,
}

impl PixelBuffer {
    /// Wrap an already decoded RGB image
    #[must_use]
    pub const fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a buffer from raw samples.
    ///
    /// Returns `None` when `data.len() != width * height * 3`.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Self::from_rgb)
    }

    /// Buffer filled with a single colour
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::from_rgb(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Channel values at `(x, y)`, or `None` when out of bounds
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            *pixel = Rgb(rgb);
        }
    }

    /// Raw samples, row-major
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Borrow as an `image` buffer
    #[must_use]
    pub const fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

/// Something that can turn a file into a [`PixelBuffer`]
pub trait ImageDecoder {
    /// Decode `path` into the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`PixdiffError::Decode`] when the file cannot be read or is not
    /// a recognised image.
    fn decode(&self, path: &Path) -> PixdiffResult<PixelBuffer>;
}

/// Decoder backed by the `image` crate, sniffing format from content
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> PixdiffResult<PixelBuffer> {
        let decode_err = |message: String| PixdiffError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let reader = ImageReader::open(path)
            .map_err(|e| decode_err(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?;
        if reader.format().is_none() {
            return Err(decode_err("unrecognised image format".to_string()));
        }
        let image = reader.decode().map_err(|e| decode_err(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "decoded image"
        );
        Ok(PixelBuffer::from_rgb(image.to_rgb8()))
    }
}
