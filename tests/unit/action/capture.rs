use std::sync::Arc;

use super::*;
use crate::camera::resolver::ManualCameras;
use crate::config::ServerConfig;
use crate::testing::{ManualClock, ScriptedFetcher, Step, scratch_files};

const GRAY: [u8; 3] = [128, 128, 128];

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

fn opts(total: u64, interval: u64) -> CaptureOptions {
    CaptureOptions {
        frame_interval: Duration::from_secs(interval),
        ..CaptureOptions::new(Duration::from_secs(total))
    }
}

fn request() -> FetchRequest {
    FetchRequest::new("http://example.com/cam.jpg")
}

#[test]
fn attempts_are_floor_of_ratio_plus_one() {
    let s = |t, i| CaptureSchedule::new(Duration::from_secs(t), Duration::from_secs(i)).unwrap();
    assert_eq!(s(4, 2).attempts(), 3);
    assert_eq!(s(5, 2).attempts(), 3);
    assert_eq!(s(1, 2).attempts(), 1);
    assert_eq!(s(0, 2).attempts(), 1);
    assert_eq!(s(4, 2).due(2), Duration::from_secs(4));
}

#[test]
fn zero_interval_is_rejected() {
    let err = CaptureSchedule::new(Duration::from_secs(4), Duration::ZERO).unwrap_err();
    assert!(matches!(err, CamsnapError::Config(_)));
}

#[test]
fn failed_attempt_is_skipped_and_order_kept() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = ScriptedFetcher::new([
        Step::Image(8, 6, GRAY),
        Step::Status(500),
        Step::Image(8, 6, GRAY),
    ]);
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock);

    let session = capture_frames(&ctx, &request(), &opts(4, 2), dir.path(), &OperationId::new())
        .unwrap();

    assert_eq!(session.state(), CaptureState::Done);
    assert_eq!(session.attempted(), 3);
    assert_eq!(session.indices(), [0, 2]);
    assert_eq!(session.skipped(), 1);
    assert!(scratch_files(dir.path()).is_empty());
}

#[test]
fn sleeps_only_for_time_remaining_until_next_slot() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = ScriptedFetcher::new((0..3).map(|_| Step::Image(4, 4, GRAY)))
        .costing(&clock, secs(0.5));
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock);

    capture_frames(&ctx, &request(), &opts(4, 2), dir.path(), &OperationId::new()).unwrap();

    assert_eq!(clock.sleeps(), [secs(1.5), secs(1.5)]);
    assert_eq!(clock.elapsed(), secs(4.5));
}

#[test]
fn never_sleeps_when_behind_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = ScriptedFetcher::new((0..3).map(|_| Step::Image(4, 4, GRAY)))
        .costing(&clock, Duration::from_secs(3));
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock);

    let session =
        capture_frames(&ctx, &request(), &opts(4, 2), dir.path(), &OperationId::new()).unwrap();

    assert!(clock.sleeps().is_empty());
    assert_eq!(session.frames().len(), 3);
}

#[test]
fn cancellation_stops_scheduling_and_keeps_frames() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let cancel = CancelFlag::default();
    let fetcher = ScriptedFetcher::new([
        Step::ImageThenCancel(4, 4, GRAY, cancel.clone()),
        Step::Image(4, 4, GRAY),
        Step::Image(4, 4, GRAY),
    ]);
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock)
        .with_cancel(cancel);

    let session =
        capture_frames(&ctx, &request(), &opts(4, 2), dir.path(), &OperationId::new()).unwrap();

    assert!(session.was_cancelled());
    assert_eq!(session.attempted(), 1);
    assert_eq!(session.indices(), [0]);
    assert_eq!(fetcher.urls().len(), 1);
    assert!(clock.sleeps().is_empty(), "no wait once cancelled");
}

#[test]
fn cancelled_before_start_makes_no_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let cancel = CancelFlag::default();
    cancel.cancel();
    let fetcher = ScriptedFetcher::new([Step::Image(4, 4, GRAY)]);
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock)
        .with_cancel(cancel);

    let session =
        capture_frames(&ctx, &request(), &opts(4, 2), dir.path(), &OperationId::new()).unwrap();

    assert!(session.was_cancelled());
    assert_eq!(session.attempted(), 0);
    assert!(fetcher.urls().is_empty());
    assert!(clock.sleeps().is_empty());
}

#[test]
fn huge_interval_is_scheduled_without_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = ScriptedFetcher::new([Step::Image(4, 4, GRAY)]);
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock);
    let opts = CaptureOptions {
        frame_interval: Duration::MAX,
        ..CaptureOptions::new(Duration::from_secs(4))
    };

    let session = capture_frames(&ctx, &request(), &opts, dir.path(), &OperationId::new()).unwrap();

    assert_eq!(session.attempted(), 1);
    assert!(clock.sleeps().is_empty());
}

#[test]
fn frames_are_bounded_and_normalized_to_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new();
    let fetcher = ScriptedFetcher::new([Step::Image(8, 6, GRAY), Step::Garbage]);
    let ctx = ActionContext::new(Arc::new(ServerConfig::default()), &fetcher, &ManualCameras)
        .with_clock(&clock);
    let opts = CaptureOptions {
        max_width: SizeBound::max_width(4),
        ..opts(2, 2)
    };

    let session = capture_frames(&ctx, &request(), &opts, dir.path(), &OperationId::new()).unwrap();

    assert_eq!(session.indices(), [0]);
    let frame = &session.frames()[0].frame;
    assert_eq!(frame.dimensions(), (4, 3));
    assert!(!frame.image().color().has_alpha());
}
