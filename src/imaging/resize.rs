use image::imageops::FilterType;

use crate::foundation::core::SizeBound;
use crate::imaging::frame::RasterFrame;

/// Downscale `frame` so its width does not exceed `bound`, keeping the aspect ratio.
///
/// Never upscales. An unbounded `bound` returns the input unchanged.
pub fn resize_bounded(frame: RasterFrame, bound: SizeBound) -> RasterFrame {
    let Some(max_width) = bound.width() else {
        return frame;
    };
    let (width, height) = frame.dimensions();
    if width <= max_width {
        return frame;
    }

    let new_height = scaled_height(width, height, max_width);
    tracing::debug!(width, height, max_width, new_height, "resizing frame");
    RasterFrame::new(
        frame
            .into_image()
            .resize_exact(max_width, new_height, FilterType::Lanczos3),
    )
}

/// `height * new_width / width`, rounded to nearest and at least one pixel.
fn scaled_height(width: u32, height: u32, new_width: u32) -> u32 {
    let w = u64::from(width);
    let scaled = (u64::from(height) * u64::from(new_width) + w / 2) / w;
    u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/resize.rs"]
mod tests;
