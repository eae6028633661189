//! Primary display geometry.
//!
//! The forbidden band is defined relative to the primary display (the one
//! carrying the menu bar).  This module queries its frame in top-down global
//! coordinates.
//!
//! # Platform implementations
//!
//! | Module  | OS    | API used                            |
//! |---------|-------|-------------------------------------|
//! | `macos` | macOS | `CGMainDisplayID` + `CGDisplayBounds` |
//!
//! A [`MockDisplayProvider`] is always compiled (not guarded by `#[cfg]`) so
//! tests on any platform can use it without a physical display.

use std::collections::VecDeque;
use std::sync::Mutex;

use guard_core::DisplayFrame;
use thiserror::Error;

#[cfg(target_os = "macos")]
pub mod macos;

/// Error type for display queries.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// No usable primary display was reported (headless session, display
    /// asleep during a configuration change, ...).
    #[error("no primary display found")]
    NoPrimaryDisplay,
}

/// Trait for reading the primary display's frame.
pub trait DisplayProvider: Send + Sync {
    /// Returns the primary display frame in top-down global coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if the OS cannot report a usable display.
    fn primary_display(&self) -> Result<DisplayFrame, ScreenInfoError>;
}

/// Display provider that replays a scripted sequence of frames.
///
/// Each call pops the next entry; once the script is exhausted the last
/// successful frame is returned forever.  `None` entries simulate a failed
/// query.
pub struct MockDisplayProvider {
    script: Mutex<VecDeque<Option<DisplayFrame>>>,
    last: Mutex<Option<DisplayFrame>>,
}

impl MockDisplayProvider {
    /// A provider that always reports `frame`.
    pub fn fixed(frame: DisplayFrame) -> Self {
        Self::scripted([Some(frame)])
    }

    /// A provider that replays `script` in order.
    pub fn scripted(script: impl IntoIterator<Item = Option<DisplayFrame>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
        }
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn primary_display(&self) -> Result<DisplayFrame, ScreenInfoError> {
        let next = self.script.lock().expect("lock poisoned").pop_front();
        let mut last = self.last.lock().expect("lock poisoned");
        match next {
            Some(Some(frame)) => {
                *last = Some(frame);
                Ok(frame)
            }
            Some(None) => Err(ScreenInfoError::NoPrimaryDisplay),
            None => (*last).ok_or(ScreenInfoError::NoPrimaryDisplay),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
