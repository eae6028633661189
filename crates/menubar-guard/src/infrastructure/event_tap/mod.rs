//! Event tap infrastructure.
//!
//! On macOS this installs a Quartz session event tap (`CGEventTapCreate`) at
//! the head of the event stream, runs it on a dedicated `CFRunLoop`, and
//! hands every mouse event to a [`PointerClampFilter`].  The filter's
//! decision is applied to the event in place before the tap returns it to
//! the system.
//!
//! # Callback latency
//!
//! The OS disables a tap whose callback takes too long and then delivers a
//! `TapDisabledByTimeout` pseudo-event.  The filter re-enables the tap when it
//! sees that event; the host additionally checks `CGEventTapIsEnabled` once
//! per maintenance slice in case the notification was never delivered.
//!
//! # Testability
//!
//! The [`EventTapHost`] trait allows tests to drive the filter with a
//! scripted event sequence ([`mock::ScriptedEventTap`]) instead of a live
//! tap.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use thiserror::Error;

use crate::application::clamp_pointer::{FilterStats, PointerClampFilter};

pub mod mock;

#[cfg(target_os = "macos")]
pub mod macos;

/// Error type for event tap operations.
#[derive(Debug, Error)]
pub enum TapError {
    /// `CGEventTapCreate` returned NULL, almost always because the process
    /// has not been granted the Accessibility permission.
    #[error(
        "failed to create event tap; grant Accessibility permission under \
         System Settings → Privacy & Security → Accessibility"
    )]
    CreateFailed,

    #[error("failed to attach event tap to the run loop")]
    RunLoopSource,

    /// The tap's run loop source disappeared while the tap was running.
    #[error("event tap was invalidated by the system")]
    Invalidated,

    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting the host that delivers events to the filter.
///
/// `run` blocks the calling thread until `running` is cleared (or the host
/// stops on its own) and returns the filter's final counters.
pub trait EventTapHost {
    /// Installs the hook, feeds events to `filter`, and tears down on exit.
    ///
    /// # Errors
    ///
    /// Returns [`TapError`] if the hook cannot be installed.
    fn run(
        self,
        filter: PointerClampFilter,
        running: Arc<AtomicBool>,
    ) -> Result<FilterStats, TapError>;
}
