//! DisplayWatcher: keeps the band's display frame current.
//!
//! The primary display can change while the guard is running (resolution
//! change, lid closed with an external monitor attached, a different display
//! promoted to primary).  The watcher re-queries the frame at most once per
//! interval and reports a new frame only when it differs from the last one.
//! Failed or unusable queries keep the last known frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use guard_core::DisplayFrame;
use tracing::{info, warn};

use crate::infrastructure::screen_info::DisplayProvider;

/// Rate-limited primary display poller.
pub struct DisplayWatcher {
    provider: Arc<dyn DisplayProvider>,
    current: DisplayFrame,
    interval: Duration,
    last_poll: Option<Instant>,
}

impl DisplayWatcher {
    /// Creates a watcher seeded with the frame queried at startup.
    pub fn new(provider: Arc<dyn DisplayProvider>, initial: DisplayFrame, interval: Duration) -> Self {
        Self {
            provider,
            current: initial,
            interval,
            last_poll: None,
        }
    }

    pub fn current(&self) -> DisplayFrame {
        self.current
    }

    /// Re-queries the display if `interval` has elapsed since the last poll.
    ///
    /// Returns `Some(frame)` only when the frame changed.
    pub fn poll(&mut self, now: Instant) -> Option<DisplayFrame> {
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_poll = Some(now);

        match self.provider.primary_display() {
            Ok(frame) if frame == self.current => None,
            Ok(frame) if !frame.is_usable() => {
                warn!(?frame, "ignoring unusable primary display frame");
                None
            }
            Ok(frame) => {
                info!(
                    width = frame.width,
                    height = frame.height,
                    "primary display changed"
                );
                self.current = frame;
                Some(frame)
            }
            Err(e) => {
                warn!("display refresh failed, keeping last known frame: {e}");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
