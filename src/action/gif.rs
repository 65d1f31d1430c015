use std::path::PathBuf;
use std::time::Duration;

use crate::action::capture::{CaptureOptions, capture_frames};
use crate::action::report::{ActionKind, OperationReport};
use crate::action::{ActionContext, work_dir};
use crate::foundation::core::OperationId;
use crate::foundation::error::{CamsnapError, CamsnapResult};
use crate::imaging::gif::{GifOptions, assemble_gif, normalize_gif_path};
use crate::source::ImageSource;

/// Capture one source over time and assemble the frames into a looping GIF.
#[derive(Clone, Debug)]
pub struct GifRequest {
    /// What to capture.
    pub source: ImageSource,
    destination: PathBuf,
    /// Capture schedule, width cap, and frame quality.
    pub capture: CaptureOptions,
    /// Playback settings.
    pub gif: GifOptions,
}

impl GifRequest {
    /// Capture `source` for `total_duration`; the destination's extension is forced to `.gif`.
    pub fn new(source: ImageSource, destination: PathBuf, total_duration: Duration) -> Self {
        Self {
            source,
            destination: normalize_gif_path(&destination),
            capture: CaptureOptions::new(total_duration),
            gif: GifOptions::default(),
        }
    }

    /// Output path, always ending in `.gif`.
    pub fn destination(&self) -> &std::path::Path {
        &self.destination
    }
}

/// Run a timed capture and write the GIF.
///
/// Frames that fail are skipped; a run that captured nothing fails with a composition error
/// and writes no file.
#[tracing::instrument(skip_all, fields(dest = %req.destination.display()))]
pub fn run_gif(ctx: &ActionContext<'_>, req: &GifRequest) -> CamsnapResult<OperationReport> {
    let started = ctx.clock.now();
    let fetch = req
        .source
        .resolve(&ctx.server, ctx.resolver, req.capture.max_width)?;

    let op = OperationId::new();
    let dir = work_dir(&req.destination);
    let session = capture_frames(ctx, &fetch, &req.capture, dir, &op)?;
    if session.frames().is_empty() {
        return Err(CamsnapError::composition("no frames captured for the gif"));
    }

    let skipped = session.skipped();
    let frames = session.into_frames();
    let count = frames.len();
    let bytes = assemble_gif(frames, &req.gif, &req.destination, &op.output_path(dir))?;
    tracing::info!(frames = count, skipped, bytes, "gif complete");
    Ok(OperationReport {
        kind: ActionKind::Gif,
        output: req.destination.clone(),
        frames: count,
        skipped,
        bytes,
        elapsed: ctx.clock.now().saturating_duration_since(started),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/action/gif.rs"]
mod tests;
