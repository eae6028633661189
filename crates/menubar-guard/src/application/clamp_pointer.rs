//! PointerClampFilter: applies the clamp engine to live pointer events.
//!
//! The filter is the handler the event tap invokes for every mouse event.
//! It asks [`ClampEngine`] for a [`Verdict`], performs the side effects the
//! verdict calls for, and hands the [`Decision`] back to the tap.
//!
//! # Architecture
//!
//! The filter depends only on traits ([`CursorController`],
//! [`HookController`]) and domain types.  The Quartz implementations are
//! injected at construction time, making the filter fully unit-testable.
//!
//! # Latency
//!
//! The tap callback runs synchronously on the OS input path.  If it takes
//! too long the OS disables the tap and reports `TapDisabledByTimeout`.
//! [`PointerClampFilter::process`] therefore performs at most one cursor warp
//! and never blocks or allocates.

use std::sync::Arc;

use guard_core::{
    ClampEngine, ClampPolicy, ContainmentState, Decision, DisplayFrame, Point, PointerEvent,
    PolicyError,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Error returned when the cursor could not be warped.
#[derive(Debug, Error)]
pub enum RelocationError {
    #[error("cursor warp failed: {0}")]
    Platform(String),
}

/// Trait for moving the physical cursor.
///
/// Infrastructure implementation calls `CGWarpMouseCursorPosition`; test
/// implementations record calls.
#[cfg_attr(test, mockall::automock)]
pub trait CursorController: Send + Sync {
    /// Moves the cursor to `to` in top-down global coordinates.
    fn warp_cursor(&self, to: Point) -> Result<(), RelocationError>;
}

/// Trait for re-enabling the event tap after the OS revoked it.
#[cfg_attr(test, mockall::automock)]
pub trait HookController: Send + Sync {
    /// Re-enables the hook and reports whether it is enabled afterwards.
    fn request_reenable(&self) -> bool;
}

/// A handler the event tap calls once per delivered event.
pub trait PointerEventHandler {
    fn process(&mut self, event: &PointerEvent) -> Decision;
}

/// Counters accumulated over the filter's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub events: u64,
    pub forwarded: u64,
    pub rewritten: u64,
    pub suppressed: u64,
    pub relocations: u64,
    pub relocation_failures: u64,
    pub reenable_requests: u64,
}

/// The pointer clamp filter.
pub struct PointerClampFilter {
    engine: ClampEngine,
    cursor: Arc<dyn CursorController>,
    hook: Arc<dyn HookController>,
    stats: FilterStats,
}

impl PointerClampFilter {
    /// Creates a filter in the `Outside` state.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the policy fails validation.
    pub fn new(
        policy: ClampPolicy,
        cursor: Arc<dyn CursorController>,
        hook: Arc<dyn HookController>,
    ) -> Result<Self, PolicyError> {
        Ok(Self {
            engine: ClampEngine::new(policy)?,
            cursor,
            hook,
            stats: FilterStats::default(),
        })
    }

    pub fn policy(&self) -> &ClampPolicy {
        self.engine.policy()
    }

    pub fn state(&self) -> ContainmentState {
        self.engine.state()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Points the band's horizontal span at a new primary display frame.
    pub fn set_display_frame(&mut self, frame: DisplayFrame) {
        self.engine.set_display_frame(frame);
        if self.engine.band().covers_display() {
            warn!(
                band_height = self.engine.band().height(),
                display_height = frame.height,
                "forbidden band covers the entire primary display"
            );
        }
    }

    /// Re-enables the hook from outside the event path, e.g. after the
    /// periodic health check found it disabled.  Counted like a re-enable
    /// triggered by a tap-disabled notification.
    ///
    /// Returns whether the hook is enabled afterwards.
    pub fn restore_hook(&mut self) -> bool {
        self.stats.reenable_requests += 1;
        self.hook.request_reenable()
    }

    fn relocate(&mut self, to: Point) {
        match self.cursor.warp_cursor(to) {
            Ok(()) => {
                self.stats.relocations += 1;
                debug!(x = to.x, y = to.y, "cursor relocated to band edge");
            }
            Err(e) => {
                self.stats.relocation_failures += 1;
                warn!("{e}");
            }
        }
    }

    fn reenable_hook(&mut self, event: &PointerEvent) {
        self.stats.reenable_requests += 1;
        warn!(kind = ?event.kind, "event tap disabled by the system, re-enabling");
        if !self.hook.request_reenable() {
            warn!("event tap is still disabled after re-enable; the health check will retry");
        }
    }
}

impl PointerEventHandler for PointerClampFilter {
    fn process(&mut self, event: &PointerEvent) -> Decision {
        self.stats.events += 1;
        let verdict = self.engine.evaluate(event);

        if verdict.reenable_hook {
            self.reenable_hook(event);
        }
        if let Some(to) = verdict.relocate_to {
            self.relocate(to);
        }

        match verdict.decision {
            Decision::Forward => {
                self.stats.forwarded += 1;
                trace!(kind = ?event.kind, y = event.position.y, "forward");
            }
            Decision::ForwardModified(to) => {
                self.stats.rewritten += 1;
                trace!(kind = ?event.kind, from_y = event.position.y, to_y = to.y, "rewrite");
            }
            Decision::Suppress => {
                self.stats.suppressed += 1;
                debug!(kind = ?event.kind, y = event.position.y, "blocked mouse click in band");
            }
        }
        verdict.decision
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
