//! Behavioural tests for the clamp engine through the public API.
//!
//! Each test drives a [`ClampEngine`] with a short event script and checks the
//! decisions, relocations and containment state that come out of it.

use guard_core::{
    BandSpan, ClampEngine, ClampPolicy, ContainmentState, Decision, MouseButton, Point,
    PointerEvent, PointerEventKind,
};

fn strict_engine(height: f64) -> ClampEngine {
    ClampEngine::new(ClampPolicy::strict(height).with_span(BandSpan::FullWidth))
        .expect("policy must be valid")
}

#[test]
fn test_band_boundary_row_is_outside_and_row_above_is_inside() {
    let mut engine = strict_engine(20.0);

    let at_edge = engine.evaluate(&PointerEvent::moved(100.0, 20.0));
    assert_eq!(at_edge.decision, Decision::Forward);
    assert_eq!(engine.state(), ContainmentState::Outside);

    let just_above = engine.evaluate(&PointerEvent::moved(100.0, 20.0 - 1e-9));
    assert_eq!(
        just_above.decision,
        Decision::ForwardModified(Point::new(100.0, 20.0))
    );
    assert_eq!(engine.state(), ContainmentState::Inside);
}

#[test]
fn test_consecutive_in_band_motion_relocates_exactly_once() {
    let mut engine = strict_engine(20.0);

    let relocations = (0..50)
        .map(|i| engine.evaluate(&PointerEvent::moved(i as f64, 4.0)))
        .filter(|verdict| verdict.relocate_to.is_some())
        .count();

    assert_eq!(relocations, 1);
}

#[test]
fn test_button_down_suppressed_only_inside_band() {
    let mut inside = strict_engine(20.0);
    let mut outside = strict_engine(20.0);

    let suppressed = inside.evaluate(&PointerEvent::button_down(MouseButton::Left, 50.0, 8.0));
    let forwarded = outside.evaluate(&PointerEvent::button_down(MouseButton::Left, 50.0, 20.0));

    assert_eq!(suppressed.decision, Decision::Suppress);
    assert_eq!(forwarded.decision, Decision::Forward);
}

#[test]
fn test_rewrite_never_alters_x() {
    let mut engine = strict_engine(32.0);

    for (x, y) in [(0.0, 0.0), (17.5, 31.9), (1511.0, 12.0), (-40.0, 3.0)] {
        let verdict = engine.evaluate(&PointerEvent::moved(x, y));
        assert_eq!(verdict.decision, Decision::ForwardModified(Point::new(x, 32.0)));
    }
}

#[test]
fn test_leaving_band_rearms_one_shot_relocation() {
    let mut engine = strict_engine(20.0);
    let script = [
        PointerEvent::moved(10.0, 5.0),
        PointerEvent::moved(10.0, 6.0),
        PointerEvent::moved(10.0, 7.0),
        PointerEvent::moved(10.0, 200.0),
        PointerEvent::moved(10.0, 5.0),
    ];

    let relocated: Vec<bool> = script
        .iter()
        .map(|event| engine.evaluate(event).relocate_to.is_some())
        .collect();

    assert_eq!(relocated, vec![true, false, false, false, true]);
}

#[test]
fn test_tap_revocation_always_requests_reenable() {
    for prime_inside in [false, true] {
        let mut engine = strict_engine(20.0);
        if prime_inside {
            engine.evaluate(&PointerEvent::moved(10.0, 5.0));
        }
        let before = engine.state();

        for kind in [
            PointerEventKind::TapDisabledByTimeout,
            PointerEventKind::TapDisabledByUserInput,
        ] {
            let verdict = engine.evaluate(&PointerEvent::new(kind, 0.0, 0.0));
            assert!(verdict.reenable_hook);
            assert_eq!(engine.state(), before);
        }
    }
}

#[test]
fn test_motion_exit_then_click_reentry_sequence() {
    // band_height = 20: motion(10,5), motion(10,30), buttonDown(10,5)
    let mut engine = strict_engine(20.0);

    let first = engine.evaluate(&PointerEvent::moved(10.0, 5.0));
    assert_eq!(first.decision, Decision::ForwardModified(Point::new(10.0, 20.0)));
    assert_eq!(first.relocate_to, Some(Point::new(10.0, 20.0)));
    assert_eq!(engine.state(), ContainmentState::Inside);

    let second = engine.evaluate(&PointerEvent::moved(10.0, 30.0));
    assert_eq!(second.decision, Decision::Forward);
    assert_eq!(second.relocate_to, None);
    assert_eq!(engine.state(), ContainmentState::Outside);

    let third = engine.evaluate(&PointerEvent::button_down(MouseButton::Left, 10.0, 5.0));
    assert_eq!(third.decision, Decision::Suppress);
    assert_eq!(third.relocate_to, Some(Point::new(10.0, 20.0)));
    assert_eq!(engine.state(), ContainmentState::Inside);
}
