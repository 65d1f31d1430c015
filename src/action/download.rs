use std::path::PathBuf;

use anyhow::Context as _;
use image::ImageFormat;

use crate::action::report::{ActionKind, OperationReport};
use crate::action::{ActionContext, work_dir};
use crate::foundation::cleanup::TempFile;
use crate::foundation::core::{OperationId, SizeBound};
use crate::foundation::error::{CamsnapError, CamsnapResult};
use crate::imaging::frame::RasterFrame;
use crate::imaging::resize::resize_bounded;
use crate::source::ImageSource;

/// Fetch one image to a local file.
#[derive(Clone, Debug)]
pub struct DownloadRequest {
    /// What to fetch.
    pub source: ImageSource,
    /// Validated absolute output path, see [`crate::action::destination::resolve_destination`].
    pub destination: PathBuf,
    /// Camera sources ask the server for this width; URL sources are resized locally.
    pub max_width: SizeBound,
    /// Suppress the per-fetch log line.
    pub quiet: bool,
}

impl DownloadRequest {
    /// Unbounded, non-quiet download of `source` to `destination`.
    pub fn new(source: ImageSource, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            max_width: SizeBound::UNBOUNDED,
            quiet: false,
        }
    }
}

/// Download `req.source` to `req.destination`.
///
/// The bytes land in an operation-scoped temp file next to the destination and are moved into
/// place only on success, so a failed download never leaves a partial file behind.
#[tracing::instrument(skip_all, fields(dest = %req.destination.display()))]
pub fn run_download(ctx: &ActionContext<'_>, req: &DownloadRequest) -> CamsnapResult<OperationReport> {
    let started = ctx.clock.now();
    if ctx.cancel.is_cancelled() {
        return Err(CamsnapError::Cancelled);
    }

    let mut fetch = req.source.resolve(&ctx.server, ctx.resolver, req.max_width)?;
    fetch.quiet = req.quiet;

    let op = OperationId::new();
    let dir = work_dir(&req.destination);
    let tmp = TempFile::new(op.temp_path(dir, 0));
    ctx.fetcher.fetch(&fetch, tmp.path())?;

    let resize_locally = req.max_width.is_bounded() && !req.source.needs_server();
    if resize_locally {
        let frame = RasterFrame::open(tmp.path())?;
        let original = frame.dimensions();
        let frame = resize_bounded(frame, req.max_width);
        if frame.dimensions() == original {
            tmp.persist(&req.destination)?;
        } else {
            drop(tmp);
            let format = ImageFormat::from_path(&req.destination).unwrap_or(ImageFormat::Jpeg);
            let out = TempFile::new(op.output_path(dir));
            frame
                .image()
                .to_rgb8()
                .save_with_format(out.path(), format)
                .with_context(|| format!("write '{}'", out.path().display()))?;
            out.persist(&req.destination)?;
        }
    } else {
        tmp.persist(&req.destination)?;
    }

    let bytes = std::fs::metadata(&req.destination)
        .with_context(|| format!("stat '{}'", req.destination.display()))?
        .len();
    let report = OperationReport {
        kind: ActionKind::Download,
        output: req.destination.clone(),
        frames: 1,
        skipped: 0,
        bytes,
        elapsed: ctx.clock.now().saturating_duration_since(started),
    };
    tracing::info!(source = %fetch.source_name, bytes, "download complete");
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/action/download.rs"]
mod tests;
