//! The clamp engine: a per-event state machine over the forbidden band.
//!
//! [`ClampEngine::evaluate`] is a total function from a [`PointerEvent`] to a
//! [`Verdict`].  The verdict says what should happen to the event
//! ([`Decision`]) and which side effects the caller must perform (warp the
//! cursor, re-enable the hook).  The engine itself performs none of them,
//! so it can be exercised on any platform.
//!
//! # State machine (one-shot relocation)
//!
//! ```text
//!            in-band event / relocate once
//!   Outside ───────────────────────────────▶ Inside ──┐
//!      ▲                                       │      │ in-band event /
//!      └──────── out-of-band event ────────────┘ ◀────┘ no relocation
//! ```
//!
//! Tap-disabled notifications never change the state.

use super::band::ForbiddenBand;
use super::event::PointerEvent;
use super::geometry::{DisplayFrame, Point};
use super::policy::{ClampPolicy, PolicyError};

/// What the host must do with the event it delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Deliver the event unchanged.
    Forward,
    /// Deliver the event with its location replaced by the given point.
    ForwardModified(Point),
    /// Drop the event; no downstream consumer sees it.
    Suppress,
}

/// Whether the cursor is currently inside the forbidden band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainmentState {
    #[default]
    Outside,
    Inside,
}

/// Result of evaluating one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub decision: Decision,
    /// Absolute cursor position to warp to, if any.
    pub relocate_to: Option<Point>,
    /// The hook was revoked by the OS and must be re-enabled now.
    pub reenable_hook: bool,
}

impl Verdict {
    fn forward() -> Self {
        Self {
            decision: Decision::Forward,
            relocate_to: None,
            reenable_hook: false,
        }
    }
}

/// Pointer clamp state machine.
#[derive(Debug, Clone)]
pub struct ClampEngine {
    policy: ClampPolicy,
    band: ForbiddenBand,
    state: ContainmentState,
}

impl ClampEngine {
    /// Creates an engine in the [`ContainmentState::Outside`] state.
    ///
    /// # Errors
    ///
    /// Returns the [`PolicyError`] from [`ClampPolicy::validate`].
    pub fn new(policy: ClampPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            policy,
            band: policy.band(),
            state: ContainmentState::Outside,
        })
    }

    pub fn policy(&self) -> &ClampPolicy {
        &self.policy
    }

    pub fn band(&self) -> &ForbiddenBand {
        &self.band
    }

    pub fn state(&self) -> ContainmentState {
        self.state
    }

    /// Updates the primary display frame backing the band's horizontal span.
    pub fn set_display_frame(&mut self, frame: DisplayFrame) {
        self.band.set_display_frame(frame);
    }

    /// Evaluates one event and advances the containment state.
    pub fn evaluate(&mut self, event: &PointerEvent) -> Verdict {
        if event.kind.is_tap_disabled() {
            return Verdict {
                reenable_hook: true,
                ..Verdict::forward()
            };
        }

        if self.policy.track_motion_only && !event.kind.is_motion_or_drag() {
            return Verdict::forward();
        }

        if !self.band.contains(event.position) {
            self.state = ContainmentState::Outside;
            return Verdict::forward();
        }

        let target = self.band.clamp_target(event.position);
        let entering = self.state == ContainmentState::Outside;
        self.state = ContainmentState::Inside;

        let relocate_to = if entering || !self.policy.one_shot_relocation {
            Some(target)
        } else {
            None
        };

        let decision = if self.policy.suppress_clicks && event.kind.is_click() {
            Decision::Suppress
        } else if self.policy.rewrite_position {
            Decision::ForwardModified(target)
        } else {
            Decision::Forward
        };

        Verdict {
            decision,
            relocate_to,
            reenable_hook: false,
        }
    }
}
