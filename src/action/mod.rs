//! User-facing operations: download, stitch, and timed GIF capture.
//!
//! Every operation takes an [`ActionContext`] holding an immutable snapshot of the server
//! configuration plus the fetcher, resolver, and clock seams, and returns an
//! [`report::OperationReport`] on success.

use std::path::Path;
use std::sync::Arc;

use crate::camera::resolver::CameraResolver;
use crate::config::ServerConfig;
use crate::fetch::http::{FetchRequest, ImageFetcher};
use crate::foundation::cleanup::TempFile;
use crate::foundation::core::SizeBound;
use crate::foundation::error::FetchError;
use crate::imaging::frame::RasterFrame;
use crate::imaging::resize::resize_bounded;

/// Timed frame capture and its clock/cancellation seams.
pub mod capture;
/// Output path validation.
pub mod destination;
/// Single image download.
pub mod download;
/// Timed capture assembled into an animated GIF.
pub mod gif;
/// Success summaries.
pub mod report;
/// Vertical stitch of several sources.
pub mod stitch;

use self::capture::{CancelFlag, Clock, SystemClock};

/// Everything an operation needs besides its request.
pub struct ActionContext<'a> {
    /// Configuration snapshot taken when the operation started.
    pub server: Arc<ServerConfig>,
    /// Network seam.
    pub fetcher: &'a dyn ImageFetcher,
    /// Camera reference lookup.
    pub resolver: &'a dyn CameraResolver,
    /// Time source for capture scheduling and elapsed-time reports.
    pub clock: &'a dyn Clock,
    /// Checked before every fetch.
    pub cancel: CancelFlag,
}

impl<'a> ActionContext<'a> {
    /// Context on the system clock with a fresh cancellation flag.
    pub fn new(
        server: Arc<ServerConfig>,
        fetcher: &'a dyn ImageFetcher,
        resolver: &'a dyn CameraResolver,
    ) -> Self {
        Self {
            server,
            fetcher,
            resolver,
            clock: &SystemClock,
            cancel: CancelFlag::default(),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Share an existing cancellation flag.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Fetch into `scratch`, decode, and apply the width bound.
///
/// The scratch file is removed before returning, whether or not the fetch succeeded.
pub(crate) fn acquire_frame(
    fetcher: &dyn ImageFetcher,
    request: &FetchRequest,
    scratch: &Path,
    bound: SizeBound,
) -> Result<RasterFrame, FetchError> {
    let tmp = TempFile::new(scratch.to_path_buf());
    fetcher.fetch(request, tmp.path())?;
    let frame = RasterFrame::open(tmp.path())?;
    drop(tmp);
    Ok(resize_bounded(frame, bound))
}

/// Directory temp files for `dest` are created in.
pub(crate) fn work_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
