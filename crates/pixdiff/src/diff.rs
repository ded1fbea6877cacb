//! Exact per-pixel difference between two buffers.
//!
//! There is no tolerance: a single channel differing by one at a single
//! position is a mismatch.

use crate::loader::PixelBuffer;
use crate::result::{PixdiffError, PixdiffResult};
use serde::Serialize;

/// Minimal rectangle enclosing every differing pixel.
///
/// `right` and `bottom` are exclusive, so a single pixel at `(x, y)` has the
/// box `(x, y, x + 1, y + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    /// Leftmost differing column
    pub left: u32,
    /// Topmost differing row
    pub top: u32,
    /// One past the rightmost differing column
    pub right: u32,
    /// One past the bottommost differing row
    pub bottom: u32,
}

impl BoundingBox {
    fn at(x: u32, y: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + 1,
            bottom: y + 1,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x + 1);
        self.bottom = self.bottom.max(y + 1);
    }

    /// Box width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Box height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Outcome of comparing two buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifferenceResult {
    /// Every channel of every pixel is equal
    NoDifference,
    /// At least one channel differs somewhere
    Difference {
        /// Rectangle around all differing pixels
        bounding_box: BoundingBox,
        /// Number of pixels with a non-zero delta
        differing_pixels: usize,
        /// Full-size absolute difference, same shape as the inputs
        diff: PixelBuffer,
    },
}

/// Per-channel absolute difference of two equally sized buffers.
///
/// # Errors
///
/// Returns [`PixdiffError::DimensionMismatch`] when the shapes differ.
pub fn compute_difference(
    source: &PixelBuffer,
    target: &PixelBuffer,
) -> PixdiffResult<DifferenceResult> {
    if source.dimensions() != target.dimensions() {
        return Err(PixdiffError::DimensionMismatch {
            source_size: source.dimensions(),
            target_size: target.dimensions(),
        });
    }

    let (width, height) = source.dimensions();
    let mut samples = Vec::with_capacity(source.as_raw().len());
    let mut bounding_box: Option<BoundingBox> = None;
    let mut differing_pixels = 0usize;

    let pixels = source
        .as_raw()
        .chunks_exact(3)
        .zip(target.as_raw().chunks_exact(3));
    for (index, (a, b)) in pixels.enumerate() {
        let delta = [a[0].abs_diff(b[0]), a[1].abs_diff(b[1]), a[2].abs_diff(b[2])];
        samples.extend_from_slice(&delta);

        if delta != [0, 0, 0] {
            differing_pixels += 1;
            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            match bounding_box.as_mut() {
                Some(bbox) => bbox.include(x, y),
                None => bounding_box = Some(BoundingBox::at(x, y)),
            }
        }
    }

    let Some(bounding_box) = bounding_box else {
        return Ok(DifferenceResult::NoDifference);
    };
    let diff = PixelBuffer::from_raw(width, height, samples).ok_or_else(|| {
        PixdiffError::DimensionMismatch {
            source_size: (width, height),
            target_size: target.dimensions(),
        }
    })?;

    Ok(DifferenceResult::Difference {
        bounding_box,
        differing_pixels,
        diff,
    })
}
