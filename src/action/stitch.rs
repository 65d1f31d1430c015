use std::path::PathBuf;

use anyhow::Context as _;
use image::ImageFormat;

use crate::action::report::{ActionKind, OperationReport};
use crate::action::{ActionContext, acquire_frame, work_dir};
use crate::foundation::cleanup::TempFile;
use crate::foundation::core::{OperationId, SizeBound};
use crate::foundation::error::{CamsnapError, CamsnapResult};
use crate::imaging::stitch::stitch;
use crate::source::ImageSource;

/// Most slots one stitch accepts.
pub const MAX_STITCH_SOURCES: usize = 10;

/// Stack the images of several sources into one file.
#[derive(Clone, Debug)]
pub struct StitchRequest {
    sources: Vec<Option<ImageSource>>,
    /// Validated absolute output path.
    pub destination: PathBuf,
    /// Width cap applied to every source before stacking.
    pub max_width: SizeBound,
}

impl StitchRequest {
    /// Build a request from up to [`MAX_STITCH_SOURCES`] slots. `None` slots are empty.
    pub fn new(sources: Vec<Option<ImageSource>>, destination: PathBuf) -> CamsnapResult<Self> {
        if sources.len() > MAX_STITCH_SOURCES {
            return Err(CamsnapError::config(format!(
                "stitch accepts at most {MAX_STITCH_SOURCES} sources, got {}",
                sources.len()
            )));
        }
        Ok(Self {
            sources,
            destination,
            max_width: SizeBound::UNBOUNDED,
        })
    }

    /// Parse raw slot strings with [`ImageSource::parse_slot`].
    pub fn from_slots<S: AsRef<str>>(slots: &[S], destination: PathBuf) -> CamsnapResult<Self> {
        Self::new(
            slots.iter().map(|s| ImageSource::parse_slot(s.as_ref())).collect(),
            destination,
        )
    }

    /// Cap every source's width.
    pub fn with_max_width(mut self, bound: SizeBound) -> Self {
        self.max_width = bound;
        self
    }

    /// Slots in order, including empty ones.
    pub fn sources(&self) -> &[Option<ImageSource>] {
        &self.sources
    }
}

/// Fetch every source in order, skip the ones that fail, and stack the rest.
///
/// Fails before any network activity if a camera slot is present and the server is not
/// configured, and with a composition error if no source produced an image.
#[tracing::instrument(skip_all, fields(dest = %req.destination.display(), slots = req.sources.len()))]
pub fn run_stitch(ctx: &ActionContext<'_>, req: &StitchRequest) -> CamsnapResult<OperationReport> {
    let started = ctx.clock.now();
    if req.sources.iter().flatten().any(ImageSource::needs_server) {
        ctx.server.require_base_url()?;
    }

    let op = OperationId::new();
    let dir = work_dir(&req.destination);
    let mut frames = Vec::new();
    let mut skipped = 0usize;

    for (index, slot) in req.sources.iter().enumerate() {
        let Some(source) = slot else {
            continue;
        };
        if ctx.cancel.is_cancelled() {
            tracing::info!(slot = index, "stitch cancelled");
            return Err(CamsnapError::Cancelled);
        }
        let fetch = match source.resolve(&ctx.server, ctx.resolver, req.max_width) {
            Ok(fetch) => fetch,
            Err(err) => {
                tracing::warn!(slot = index, error = %err, "skipping source");
                skipped += 1;
                continue;
            }
        };
        match acquire_frame(ctx.fetcher, &fetch, &op.temp_path(dir, index), req.max_width) {
            Ok(frame) => frames.push(frame),
            Err(err) => {
                tracing::warn!(slot = index, source = %fetch.source_name, error = %err, "skipping source");
                skipped += 1;
            }
        }
    }

    if frames.is_empty() {
        return Err(CamsnapError::composition("no images to stitch"));
    }

    let canvas = stitch(&frames);
    let format = ImageFormat::from_path(&req.destination).unwrap_or(ImageFormat::Jpeg);
    let out = TempFile::new(op.output_path(dir));
    canvas.save(out.path(), format)?;
    out.persist(&req.destination)?;

    let bytes = std::fs::metadata(&req.destination)
        .with_context(|| format!("stat '{}'", req.destination.display()))?
        .len();
    tracing::info!(
        images = frames.len(),
        skipped,
        width = canvas.width(),
        height = canvas.height(),
        bytes,
        "stitch complete"
    );
    Ok(OperationReport {
        kind: ActionKind::Stitch,
        output: req.destination.clone(),
        frames: frames.len(),
        skipped,
        bytes,
        elapsed: ctx.clock.now().saturating_duration_since(started),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/action/stitch.rs"]
mod tests;
