//! macOS event tap via Quartz Event Services.
//!
//! The tap is created with `kCGSessionEventTap` / `kCGHeadInsertEventTap` /
//! `kCGEventTapOptionDefault`, i.e. an active filter that sees mouse events
//! before any application and may rewrite or drop them.  Creation fails
//! unless the process holds the Accessibility permission.
//!
//! The callback is a closure borrowing the filter, so the filter lives on the
//! tap thread's stack for exactly as long as the tap does.  Suppressed events
//! are turned into `kCGEventNull`, which the window server discards.
//!
//! The run loop is driven in slices of the maintenance interval.  Between
//! slices the host re-checks that the tap is still enabled, refreshes the
//! primary display frame, and observes the shutdown flag.  A slice that
//! returns `kCFRunLoopRunFinished` means the tap's source is gone (the
//! system invalidated the mach port), so the host stops with
//! [`TapError::Invalidated`].

#![cfg(target_os = "macos")]

use std::cell::RefCell;
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use core_foundation::base::TCFType;
use core_foundation::runloop::{
    kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop, CFRunLoopRunResult,
};
use core_graphics::display::CGDisplay;
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventTapProxy, CGEventType,
};
use core_graphics::geometry::CGPoint;
use guard_core::{Decision, EventMask, Point, PointerEvent, PointerEventKind};
use tracing::{error, info, warn};

use super::{EventTapHost, TapError};
use crate::application::clamp_pointer::{
    CursorController, FilterStats, HookController, PointerClampFilter, PointerEventHandler,
    RelocationError,
};
use crate::application::watch_display::DisplayWatcher;

// `core-graphics` can enable a tap but does not expose its enabled state.
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapEnable(tap: *mut c_void, enable: bool);
    fn CGEventTapIsEnabled(tap: *mut c_void) -> bool;
}

// ── Hook control ──────────────────────────────────────────────────────────────

/// Shared handle to the live tap's mach port.
///
/// The filter holds one (as its [`HookController`]) and the host holds
/// another; the port is attached while the tap is installed and detached
/// before it is released.
#[derive(Debug, Default)]
pub struct TapControl {
    port: AtomicPtr<c_void>,
}

impl TapControl {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&self, port: *mut c_void) {
        self.port.store(port, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.port.store(ptr::null_mut(), Ordering::SeqCst);
    }

    /// Whether a tap is attached and currently enabled.
    pub fn is_enabled(&self) -> bool {
        let port = self.port.load(Ordering::SeqCst);
        // SAFETY: a non-null port is a live CFMachPort; `detach` runs before
        // the tap is dropped.
        !port.is_null() && unsafe { CGEventTapIsEnabled(port) }
    }

    fn set_enabled(&self, enable: bool) {
        let port = self.port.load(Ordering::SeqCst);
        if !port.is_null() {
            // SAFETY: see `is_enabled`.
            unsafe { CGEventTapEnable(port, enable) };
        }
    }
}

impl HookController for TapControl {
    fn request_reenable(&self) -> bool {
        self.set_enabled(true);
        self.is_enabled()
    }
}

// ── Cursor control ────────────────────────────────────────────────────────────

/// Warps the cursor with `CGWarpMouseCursorPosition`.
///
/// The warp does not generate a mouse event, so it cannot feed back into the
/// tap.
#[derive(Debug, Default)]
pub struct CgCursorController;

impl CgCursorController {
    pub fn new() -> Self {
        Self
    }
}

impl CursorController for CgCursorController {
    fn warp_cursor(&self, to: Point) -> Result<(), RelocationError> {
        CGDisplay::warp_mouse_cursor_position(CGPoint::new(to.x, to.y)).map_err(|code| {
            RelocationError::Platform(format!("CGWarpMouseCursorPosition returned {code}"))
        })
    }
}

// ── Event type mapping ────────────────────────────────────────────────────────

fn cg_event_type(kind: PointerEventKind) -> Option<CGEventType> {
    let cg = match kind.raw() {
        1 => CGEventType::LeftMouseDown,
        2 => CGEventType::LeftMouseUp,
        3 => CGEventType::RightMouseDown,
        4 => CGEventType::RightMouseUp,
        5 => CGEventType::MouseMoved,
        6 => CGEventType::LeftMouseDragged,
        7 => CGEventType::RightMouseDragged,
        25 => CGEventType::OtherMouseDown,
        26 => CGEventType::OtherMouseUp,
        27 => CGEventType::OtherMouseDragged,
        _ => return None,
    };
    Some(cg)
}

fn events_of_interest(mask: EventMask) -> Vec<CGEventType> {
    mask.kinds().into_iter().filter_map(cg_event_type).collect()
}

/// Writes the filter's decision into the event the tap hands back.
fn apply(decision: Decision, event: &CGEvent) {
    match decision {
        Decision::Forward => {}
        Decision::ForwardModified(to) => event.set_location(CGPoint::new(to.x, to.y)),
        Decision::Suppress => event.set_type(CGEventType::Null),
    }
}

/// `Finished` means the run loop has no sources left to wait on.
fn run_loop_exhausted(result: CFRunLoopRunResult) -> bool {
    matches!(result, CFRunLoopRunResult::Finished)
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Live [`EventTapHost`] backed by a Quartz session event tap.
pub struct MacosEventTap {
    control: Arc<TapControl>,
    interval: Duration,
    watcher: Option<DisplayWatcher>,
}

impl MacosEventTap {
    /// `control` must be the same handle the filter was built with.
    pub fn new(control: Arc<TapControl>, interval: Duration) -> Self {
        Self {
            control,
            interval,
            watcher: None,
        }
    }

    /// Refreshes the band's display frame between run loop slices.
    pub fn with_display_watcher(mut self, watcher: DisplayWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    fn maintain(&mut self, filter: &RefCell<PointerClampFilter>) {
        if !self.control.is_enabled() {
            warn!("event tap found disabled during health check, re-enabling");
            let enabled = match filter.try_borrow_mut() {
                Ok(mut filter) => filter.restore_hook(),
                Err(_) => self.control.request_reenable(),
            };
            if !enabled {
                error!("event tap could not be re-enabled");
            }
        }

        if let Some(watcher) = self.watcher.as_mut() {
            if let Some(frame) = watcher.poll(Instant::now()) {
                if let Ok(mut filter) = filter.try_borrow_mut() {
                    filter.set_display_frame(frame);
                }
            }
        }
    }
}

impl EventTapHost for MacosEventTap {
    fn run(
        mut self,
        filter: PointerClampFilter,
        running: Arc<AtomicBool>,
    ) -> Result<FilterStats, TapError> {
        let mask = filter.policy().events_of_interest();
        let interest = events_of_interest(mask);
        let filter = RefCell::new(filter);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::Default,
            interest,
            |_proxy: CGEventTapProxy, etype: CGEventType, event: &CGEvent| {
                // Re-entrant delivery while the host holds the filter: pass through.
                let Ok(mut filter) = filter.try_borrow_mut() else {
                    return None;
                };
                let location = event.location();
                let pointer = PointerEvent::new(
                    PointerEventKind::from_raw(etype as u32),
                    location.x,
                    location.y,
                );
                apply(filter.process(&pointer), event);
                None
            },
        )
        .map_err(|()| TapError::CreateFailed)?;

        let source = tap
            .mach_port
            .create_runloop_source(0)
            .map_err(|()| TapError::RunLoopSource)?;
        let run_loop = CFRunLoop::get_current();
        // SAFETY: reading an immutable CoreFoundation constant.
        let common_modes = unsafe { kCFRunLoopCommonModes };
        run_loop.add_source(&source, common_modes);

        self.control
            .attach(tap.mach_port.as_concrete_TypeRef() as *mut c_void);
        tap.enable();
        info!(
            mask = mask.bits(),
            interval = ?self.interval,
            "event tap installed"
        );

        let mut invalidated = false;
        while running.load(Ordering::SeqCst) {
            // SAFETY: reading an immutable CoreFoundation constant.
            let default_mode = unsafe { kCFRunLoopDefaultMode };
            if run_loop_exhausted(CFRunLoop::run_in_mode(default_mode, self.interval, false)) {
                error!("event tap run loop source was removed, stopping");
                invalidated = true;
                break;
            }
            self.maintain(&filter);
        }

        self.control.set_enabled(false);
        run_loop.remove_source(&source, common_modes);
        self.control.detach();
        drop(source);
        drop(tap);
        info!("event tap removed");

        if invalidated {
            return Err(TapError::Invalidated);
        }
        Ok(filter.into_inner().stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_graphics::event::CGMouseButton;
    use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
    use guard_core::ClampPolicy;

    fn mouse_moved(x: f64, y: f64) -> CGEvent {
        let source =
            CGEventSource::new(CGEventSourceStateID::HIDSystemState).expect("event source");
        CGEvent::new_mouse_event(
            source,
            CGEventType::MouseMoved,
            CGPoint::new(x, y),
            CGMouseButton::Left,
        )
        .expect("mouse event")
    }

    // ── Applying decisions ────────────────────────────────────────────────────

    #[test]
    fn test_apply_forward_leaves_event_untouched() {
        // Arrange
        let event = mouse_moved(700.0, 5.0);

        // Act
        apply(Decision::Forward, &event);

        // Assert
        let location = event.location();
        assert_eq!((location.x, location.y), (700.0, 5.0));
        assert_eq!(event.get_type() as u32, CGEventType::MouseMoved as u32);
    }

    #[test]
    fn test_apply_forward_modified_moves_event_to_band_edge() {
        // Arrange
        let event = mouse_moved(700.0, 5.0);

        // Act
        apply(Decision::ForwardModified(Point::new(700.0, 15.0)), &event);

        // Assert
        let location = event.location();
        assert_eq!((location.x, location.y), (700.0, 15.0));
        assert_eq!(event.get_type() as u32, CGEventType::MouseMoved as u32);
    }

    #[test]
    fn test_apply_suppress_turns_event_into_null() {
        // Arrange
        let event = mouse_moved(700.0, 5.0);

        // Act
        apply(Decision::Suppress, &event);

        // Assert
        assert_eq!(event.get_type() as u32, CGEventType::Null as u32);
    }

    // ── Run loop ──────────────────────────────────────────────────────────────

    #[test]
    fn test_only_finished_slice_stops_the_host() {
        assert!(run_loop_exhausted(CFRunLoopRunResult::Finished));
        assert!(!run_loop_exhausted(CFRunLoopRunResult::TimedOut));
        assert!(!run_loop_exhausted(CFRunLoopRunResult::HandledSource));
        assert!(!run_loop_exhausted(CFRunLoopRunResult::Stopped));
    }

    #[test]
    fn test_health_check_reenable_is_counted_by_the_filter() {
        // Arrange – a detached control reports the tap as disabled
        let control = Arc::new(TapControl::new());
        let filter = PointerClampFilter::new(
            ClampPolicy::default(),
            Arc::new(CgCursorController::new()),
            control.clone(),
        )
        .expect("valid policy");
        let filter = RefCell::new(filter);
        let mut host = MacosEventTap::new(control, Duration::from_millis(50));

        // Act
        host.maintain(&filter);

        // Assert
        assert_eq!(filter.borrow().stats().reenable_requests, 1);
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    #[test]
    fn test_detached_control_reports_disabled() {
        let control = TapControl::new();

        assert!(!control.is_enabled());
        assert!(!control.request_reenable());
    }

    #[test]
    fn test_strict_interest_covers_all_mouse_types() {
        let interest = events_of_interest(ClampPolicy::strict(15.0).events_of_interest());

        assert_eq!(interest.len(), 10);
    }

    #[test]
    fn test_motion_only_interest_skips_buttons() {
        let interest = events_of_interest(ClampPolicy::lenient(15.0).events_of_interest());

        let raw: Vec<u32> = interest.into_iter().map(|t| t as u32).collect();
        assert_eq!(raw, vec![5, 6, 7, 27]);
    }

    #[test]
    fn test_tap_disabled_kinds_have_no_subscription() {
        assert!(cg_event_type(PointerEventKind::TapDisabledByTimeout).is_none());
        assert!(cg_event_type(PointerEventKind::Other(22)).is_none());
    }
}
