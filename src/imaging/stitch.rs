use std::path::Path;

use anyhow::Context as _;
use image::{ImageFormat, RgbImage};

use crate::foundation::error::CamsnapResult;
use crate::imaging::frame::RasterFrame;

/// Frames stacked top-to-bottom on one RGB canvas.
#[derive(Clone, Debug)]
pub struct CompositeCanvas {
    image: RgbImage,
    offsets: Vec<u32>,
}

impl CompositeCanvas {
    /// Canvas width: the widest input frame.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height: the sum of input heights.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Vertical offset of each input frame's band, in input order.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Borrow the canvas pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Encode the canvas to `path` as `format`.
    pub fn save(&self, path: &Path, format: ImageFormat) -> CamsnapResult<()> {
        self.image
            .save_with_format(path, format)
            .with_context(|| format!("write composite '{}'", path.display()))?;
        Ok(())
    }
}

/// Stack `frames` vertically in input order.
///
/// Each frame is pasted at x = 0 and y = the summed height of the frames before it. Narrower
/// frames leave the canvas's black default showing on their right; this seam is not filled.
/// An empty input yields a 0x0 canvas.
pub fn stitch(frames: &[RasterFrame]) -> CompositeCanvas {
    let width = frames.iter().map(RasterFrame::width).max().unwrap_or(0);
    let mut offsets = Vec::with_capacity(frames.len());
    let mut height = 0u32;
    for f in frames {
        offsets.push(height);
        height = height.saturating_add(f.height());
    }

    let mut image = RgbImage::new(width, height);
    for (frame, &y) in frames.iter().zip(&offsets) {
        image::imageops::replace(&mut image, &frame.image().to_rgb8(), 0, i64::from(y));
    }

    CompositeCanvas { image, offsets }
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/stitch.rs"]
mod tests;
