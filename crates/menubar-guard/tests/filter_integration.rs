//! End-to-end pipeline tests: config → policy → filter → scripted tap.
//!
//! These run on every platform; the scripted tap stands in for the Quartz
//! event tap and the recording doubles stand in for cursor warps and tap
//! re-enabling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use guard_core::{
    ContainmentState, Decision, DisplayFrame, MouseButton, Point, PointerEvent, PointerEventKind,
};
use menubar_guard::application::clamp_pointer::{PointerClampFilter, PointerEventHandler};
use menubar_guard::application::supervise::supervise;
use menubar_guard::application::watch_display::DisplayWatcher;
use menubar_guard::infrastructure::event_tap::mock::{
    RecordingCursor, RecordingHook, ScriptedEventTap,
};
use menubar_guard::infrastructure::screen_info::MockDisplayProvider;
use menubar_guard::infrastructure::storage::config::AppConfig;

const LAPTOP: DisplayFrame = DisplayFrame {
    x: 0.0,
    y: 0.0,
    width: 1512.0,
    height: 982.0,
};

fn build(
    toml_str: &str,
    cursor: &Arc<RecordingCursor>,
    hook: &Arc<RecordingHook>,
) -> PointerClampFilter {
    let cfg: AppConfig = toml::from_str(toml_str).expect("valid config");
    let mut filter = PointerClampFilter::new(
        cfg.policy.to_policy(),
        cursor.clone(),
        hook.clone(),
    )
    .expect("valid policy");
    filter.set_display_frame(LAPTOP);
    filter
}

const PRIMARY_ONLY: &str = "[policy]\nspan = \"primary-display\"\n";

// ── Strict preset ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_strict_session_blocks_menu_bar_clicks() {
    // Arrange
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let filter = build("", &cursor, &hook);
    let tap = ScriptedEventTap::new(vec![
        PointerEvent::moved(700.0, 400.0),
        PointerEvent::moved(700.0, 10.0),
        PointerEvent::button_down(MouseButton::Left, 700.0, 10.0),
        PointerEvent::button_up(MouseButton::Left, 700.0, 10.0),
        PointerEvent::moved(700.0, 200.0),
    ]);
    let decisions = tap.decisions();

    // Act
    let stats = supervise(tap, filter, std::future::pending())
        .await
        .expect("scripted session");

    // Assert
    let edge = Point::new(700.0, 15.0);
    assert_eq!(
        *decisions.lock().unwrap(),
        vec![
            Decision::Forward,
            Decision::ForwardModified(edge),
            Decision::Suppress,
            Decision::Suppress,
            Decision::Forward,
        ]
    );
    assert_eq!(cursor.warps(), vec![edge], "one warp per band entry");
    assert_eq!(stats.suppressed, 2);
    assert_eq!(hook.requests(), 0);
}

#[test]
fn test_primary_display_span_leaves_side_display_top_edge_free() {
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build(PRIMARY_ONLY, &cursor, &hook);

    let decision = filter.process(&PointerEvent::moved(2000.0, 2.0));

    assert_eq!(decision, Decision::Forward);
    assert_eq!(filter.state(), ContainmentState::Outside);
    assert!(cursor.warps().is_empty());
}

#[test]
fn test_default_config_guards_side_display_top_edge() {
    // Arrange
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build("", &cursor, &hook);

    // Act
    let moved = filter.process(&PointerEvent::moved(2000.0, 2.0));
    let click = filter.process(&PointerEvent::button_down(MouseButton::Left, 2000.0, 2.0));

    // Assert
    let edge = Point::new(2000.0, 15.0);
    assert_eq!(moved, Decision::ForwardModified(edge));
    assert_eq!(click, Decision::Suppress);
    assert_eq!(cursor.warps(), vec![edge]);
}

// ── Lenient preset ────────────────────────────────────────────────────────────

#[test]
fn test_lenient_session_lets_clicks_through_and_warps_continuously() {
    // Arrange
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build("[policy]\npreset = \"lenient\"\nband_height = 24.0\n", &cursor, &hook);

    // Act
    let moves: Vec<Decision> = [5.0, 6.0, 7.0]
        .into_iter()
        .map(|x| filter.process(&PointerEvent::moved(x, 3.0)))
        .collect();
    let click = filter.process(&PointerEvent::button_down(MouseButton::Left, 7.0, 3.0));

    // Assert
    assert!(moves.iter().all(|d| *d == Decision::Forward));
    assert_eq!(click, Decision::Forward);
    assert_eq!(cursor.warps().len(), 3);
    assert!(cursor.warps().iter().all(|p| p.y == 24.0));
}

// ── Hook health ───────────────────────────────────────────────────────────────

#[test]
fn test_tap_timeout_mid_session_requests_reenable_and_keeps_state() {
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build("", &cursor, &hook);

    filter.process(&PointerEvent::moved(100.0, 5.0));
    filter.process(&PointerEvent::new(
        PointerEventKind::TapDisabledByTimeout,
        0.0,
        0.0,
    ));
    filter.process(&PointerEvent::moved(100.0, 4.0));

    assert_eq!(hook.requests(), 1);
    assert_eq!(filter.state(), ContainmentState::Inside);
    assert_eq!(cursor.warps().len(), 1, "timeout must not re-arm the warp");
}

#[test]
fn test_failing_warps_do_not_stop_suppression() {
    let cursor = Arc::new(RecordingCursor::failing());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build("", &cursor, &hook);

    let decision = filter.process(&PointerEvent::button_down(MouseButton::Right, 50.0, 1.0));

    assert_eq!(decision, Decision::Suppress);
    assert_eq!(filter.stats().relocation_failures, 1);
}

// ── Display refresh ───────────────────────────────────────────────────────────

#[test]
fn test_display_change_moves_the_guarded_span() {
    // Arrange – the primary display grows to an external 4K panel
    let external = DisplayFrame::new(0.0, 0.0, 3840.0, 2160.0);
    let provider = Arc::new(MockDisplayProvider::scripted([Some(external)]));
    let mut watcher = DisplayWatcher::new(provider, LAPTOP, Duration::from_secs(1));
    let cursor = Arc::new(RecordingCursor::new());
    let hook = Arc::new(RecordingHook::new());
    let mut filter = build(PRIMARY_ONLY, &cursor, &hook);
    assert_eq!(
        filter.process(&PointerEvent::moved(2000.0, 2.0)),
        Decision::Forward
    );

    // Act
    if let Some(frame) = watcher.poll(Instant::now()) {
        filter.set_display_frame(frame);
    }
    let decision = filter.process(&PointerEvent::moved(2000.0, 2.0));

    // Assert
    assert_eq!(decision, Decision::ForwardModified(Point::new(2000.0, 15.0)));
}
