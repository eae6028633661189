//! Test doubles for the event tap.
//!
//! [`ScriptedEventTap`] feeds a fixed event sequence to the filter as if it
//! came from the OS, and records every decision.  [`RecordingCursor`] and
//! [`RecordingHook`] stand in for `CGWarpMouseCursorPosition` and
//! `CGEventTapEnable`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use guard_core::{Decision, Point, PointerEvent};

use super::{EventTapHost, TapError};
use crate::application::clamp_pointer::{
    CursorController, FilterStats, HookController, PointerClampFilter, PointerEventHandler,
    RelocationError,
};

/// Records every warp request.  Optionally fails every call.
#[derive(Debug, Default)]
pub struct RecordingCursor {
    warps: Mutex<Vec<Point>>,
    fail: bool,
}

impl RecordingCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor whose warps always fail.
    pub fn failing() -> Self {
        Self {
            warps: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn warps(&self) -> Vec<Point> {
        self.warps.lock().expect("lock poisoned").clone()
    }
}

impl CursorController for RecordingCursor {
    fn warp_cursor(&self, to: Point) -> Result<(), RelocationError> {
        self.warps.lock().expect("lock poisoned").push(to);
        if self.fail {
            return Err(RelocationError::Platform("injected failure".to_string()));
        }
        Ok(())
    }
}

/// Counts re-enable requests.
#[derive(Debug)]
pub struct RecordingHook {
    requests: AtomicUsize,
    enables: bool,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self {
            requests: AtomicUsize::new(0),
            enables: true,
        }
    }

    /// A hook that stays disabled no matter how often it is re-enabled.
    pub fn refusing() -> Self {
        Self {
            requests: AtomicUsize::new(0),
            enables: false,
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for RecordingHook {
    fn default() -> Self {
        Self::new()
    }
}

impl HookController for RecordingHook {
    fn request_reenable(&self) -> bool {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.enables
    }
}

/// An [`EventTapHost`] that replays a fixed event script.
pub struct ScriptedEventTap {
    script: Vec<PointerEvent>,
    decisions: Arc<Mutex<Vec<Decision>>>,
    hold_until_stopped: bool,
}

impl ScriptedEventTap {
    /// Replays `script` and returns as soon as it is exhausted.
    pub fn new(script: Vec<PointerEvent>) -> Self {
        Self {
            script,
            decisions: Arc::new(Mutex::new(Vec::new())),
            hold_until_stopped: false,
        }
    }

    /// Keeps "running" after the script until `running` is cleared, like a
    /// real run loop waiting for more input.
    pub fn hold_until_stopped(mut self) -> Self {
        self.hold_until_stopped = true;
        self
    }

    /// Shared handle to the recorded decisions; stays valid after `run`.
    pub fn decisions(&self) -> Arc<Mutex<Vec<Decision>>> {
        Arc::clone(&self.decisions)
    }
}

impl EventTapHost for ScriptedEventTap {
    fn run(
        self,
        mut filter: PointerClampFilter,
        running: Arc<AtomicBool>,
    ) -> Result<FilterStats, TapError> {
        for event in &self.script {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let decision = filter.process(event);
            self.decisions.lock().expect("lock poisoned").push(decision);
        }

        if self.hold_until_stopped {
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
        }
        Ok(filter.stats())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
