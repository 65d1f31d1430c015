use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::foundation::cleanup::TempFile;
use crate::foundation::error::{CamsnapError, CamsnapResult};
use crate::imaging::frame::RasterFrame;

/// Per-frame display time used unless the request overrides it.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(500);

/// `image`'s NeuQuant speed (1 = best quality, 30 = fastest).
pub const GIF_ENCODER_SPEED: i32 = 10;

/// Encoding settings for [`assemble_gif`].
#[derive(Clone, Debug)]
pub struct GifOptions {
    /// Display time of every frame. Independent of the capture interval.
    pub frame_delay: Duration,
    /// Play the frames back to front.
    pub reverse: bool,
    /// Quantizer speed, see [`GIF_ENCODER_SPEED`].
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_delay: DEFAULT_FRAME_DELAY,
            reverse: false,
            speed: GIF_ENCODER_SPEED,
        }
    }
}

/// Force the `.gif` extension, replacing any other one.
pub fn normalize_gif_path(path: &Path) -> PathBuf {
    path.with_extension("gif")
}

/// Encode `frames` as an infinitely looping GIF at `dest`.
///
/// The file is written to `scratch` first and moved into place only once encoding
/// succeeded. Returns the output size in bytes. An empty frame list writes nothing.
pub fn assemble_gif(
    mut frames: Vec<RasterFrame>,
    opts: &GifOptions,
    dest: &Path,
    scratch: &Path,
) -> CamsnapResult<u64> {
    if frames.is_empty() {
        return Err(CamsnapError::composition("no frames to assemble into a gif"));
    }
    if opts.reverse {
        frames.reverse();
    }

    let count = frames.len();
    let delay = Delay::from_saturating_duration(opts.frame_delay);
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut buf, opts.speed.clamp(1, 30));
        encoder
            .set_repeat(Repeat::Infinite)
            .context("set gif loop mode")?;
        for frame in frames {
            let rgba = frame.into_image().into_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .context("encode gif frame")?;
        }
    }

    let tmp = TempFile::new(scratch.to_path_buf());
    std::fs::write(tmp.path(), &buf)
        .with_context(|| format!("write gif '{}'", tmp.path().display()))?;
    tmp.persist(dest)?;

    tracing::debug!(frames = count, bytes = buf.len(), dest = %dest.display(), "gif assembled");
    Ok(buf.len() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/gif.rs"]
mod tests;
