use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::action::{ActionContext, acquire_frame};
use crate::fetch::http::FetchRequest;
use crate::foundation::core::{OperationId, SizeBound};
use crate::foundation::error::{CamsnapError, CamsnapResult};
use crate::imaging::frame::RasterFrame;

/// Interval between captures used unless the request overrides it.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_secs(2);

/// JPEG quality captured frames are normalized to.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Monotonic time source.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
    /// Block the calling thread for `dur`.
    fn sleep(&self, dur: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Cooperative cancellation shared between an operation and whoever may stop it.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Request cancellation. Frames already captured are kept.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return `true` once [`CancelFlag::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// When captures happen: attempt `i` is due at `i * interval` after the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSchedule {
    total: Duration,
    interval: Duration,
}

impl CaptureSchedule {
    /// Validate a schedule. The interval must be non-zero.
    pub fn new(total: Duration, interval: Duration) -> CamsnapResult<Self> {
        if interval.is_zero() {
            return Err(CamsnapError::config("frame interval must be greater than zero"));
        }
        Ok(Self { total, interval })
    }

    /// `floor(total / interval) + 1`.
    pub fn attempts(&self) -> usize {
        let n = self.total.as_nanos() / self.interval.as_nanos();
        usize::try_from(n).unwrap_or(usize::MAX).saturating_add(1)
    }

    /// Offset from the start at which attempt `index` is due.
    pub fn due(&self, index: usize) -> Duration {
        self.interval
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Total capture window.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Spacing between attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Settings for one capture run.
#[derive(Clone, Debug)]
pub struct CaptureOptions {
    /// Capture window.
    pub total_duration: Duration,
    /// Spacing between attempts.
    pub frame_interval: Duration,
    /// Width cap applied to every frame.
    pub max_width: SizeBound,
    /// Quality frames are re-encoded at.
    pub jpeg_quality: u8,
}

impl CaptureOptions {
    /// Capture for `total_duration` with default spacing and quality.
    pub fn new(total_duration: Duration) -> Self {
        Self {
            total_duration,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            max_width: SizeBound::UNBOUNDED,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Lifecycle of a [`CaptureSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// Not started.
    Idle,
    /// Attempts are in progress.
    Capturing,
    /// Finished, cancelled, or ran out of attempts.
    Done,
}

/// One successfully captured frame and the attempt that produced it.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    /// Zero-based attempt index.
    pub index: usize,
    /// Normalized frame.
    pub frame: RasterFrame,
}

/// Accumulated outcome of a capture run.
#[derive(Debug)]
pub struct CaptureSession {
    schedule: CaptureSchedule,
    state: CaptureState,
    started: Option<Instant>,
    frames: Vec<CapturedFrame>,
    attempted: usize,
    cancelled: bool,
}

impl CaptureSession {
    /// Idle session for `schedule`.
    pub fn new(schedule: CaptureSchedule) -> Self {
        Self {
            schedule,
            state: CaptureState::Idle,
            started: None,
            frames: Vec::new(),
            attempted: 0,
            cancelled: false,
        }
    }

    fn begin(&mut self, now: Instant) {
        self.started = Some(now);
        self.state = CaptureState::Capturing;
    }

    fn finish(&mut self) {
        self.state = CaptureState::Done;
    }

    fn stop_if_cancelled(&mut self, ctx: &ActionContext<'_>, index: usize) -> bool {
        if ctx.cancel.is_cancelled() {
            tracing::info!(frame = index, "capture cancelled");
            self.cancelled = true;
        }
        self.cancelled
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The schedule this session ran on.
    pub fn schedule(&self) -> CaptureSchedule {
        self.schedule
    }

    /// When the first attempt started.
    pub fn started(&self) -> Option<Instant> {
        self.started
    }

    /// Captured frames in attempt order.
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// Attempt indices that produced a frame.
    pub fn indices(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.index).collect()
    }

    /// Attempts made, successful or not.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Attempts that failed and were skipped.
    pub fn skipped(&self) -> usize {
        self.attempted - self.frames.len()
    }

    /// Return `true` when the run stopped on cancellation.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Drop the bookkeeping and keep the frames.
    pub fn into_frames(self) -> Vec<RasterFrame> {
        self.frames.into_iter().map(|f| f.frame).collect()
    }
}

/// Capture frames from `request` on `opts`' schedule.
///
/// Attempt `i` is due `i * interval` after the first one started; the loop sleeps only for the
/// time remaining until then, so a slow fetch shortens the following wait instead of shifting
/// every later attempt. Failed attempts are logged and skipped. Cancellation is checked before
/// each wait and again before each fetch.
pub fn capture_frames(
    ctx: &ActionContext<'_>,
    request: &FetchRequest,
    opts: &CaptureOptions,
    work_dir: &Path,
    op: &OperationId,
) -> CamsnapResult<CaptureSession> {
    let schedule = CaptureSchedule::new(opts.total_duration, opts.frame_interval)?;
    let mut session = CaptureSession::new(schedule);
    let start = ctx.clock.now();
    session.begin(start);

    let attempts = schedule.attempts();
    tracing::info!(
        attempts,
        interval_ms = u64::try_from(schedule.interval().as_millis()).unwrap_or(u64::MAX),
        source = %request.source_name,
        "capture started"
    );

    for index in 0..attempts {
        if session.stop_if_cancelled(ctx, index) {
            break;
        }
        if index > 0 {
            let elapsed = ctx.clock.now().saturating_duration_since(start);
            match schedule.due(index).checked_sub(elapsed) {
                Some(wait) if !wait.is_zero() => ctx.clock.sleep(wait),
                Some(_) => {}
                None => tracing::debug!(frame = index, "capture behind schedule, not sleeping"),
            }
            if session.stop_if_cancelled(ctx, index) {
                break;
            }
        }

        session.attempted += 1;
        let scratch = op.temp_path(work_dir, index);
        let result = acquire_frame(ctx.fetcher, request, &scratch, opts.max_width)
            .map_err(CamsnapError::from)
            .and_then(|frame| frame.reencode_jpeg(opts.jpeg_quality));
        match result {
            Ok(frame) => {
                tracing::debug!(frame = index, "frame captured");
                session.frames.push(CapturedFrame { index, frame });
            }
            Err(err) => tracing::warn!(frame = index, error = %err, "skipping frame"),
        }
    }

    session.finish();
    tracing::info!(
        captured = session.frames.len(),
        skipped = session.skipped(),
        "capture finished"
    );
    Ok(session)
}

#[cfg(test)]
#[path = "../../tests/unit/action/capture.rs"]
mod tests;
