//! macOS primary display query via Core Graphics.
//!
//! `CGDisplayBounds` already reports frames in the global display coordinate
//! space used by event taps (top-left origin, Y growing downward), so no
//! flip is needed here; the primary display is always at the origin.

#![cfg(target_os = "macos")]

use core_graphics::display::CGDisplay;
use guard_core::DisplayFrame;

use super::{DisplayProvider, ScreenInfoError};

/// macOS implementation of [`DisplayProvider`].
#[derive(Debug, Default)]
pub struct MacosDisplayProvider;

impl MacosDisplayProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayProvider for MacosDisplayProvider {
    fn primary_display(&self) -> Result<DisplayFrame, ScreenInfoError> {
        let bounds = CGDisplay::main().bounds();
        let frame = DisplayFrame::new(
            bounds.origin.x,
            bounds.origin.y,
            bounds.size.width,
            bounds.size.height,
        );
        if !frame.is_usable() {
            return Err(ScreenInfoError::NoPrimaryDisplay);
        }
        Ok(frame)
    }
}
