//! Points and display frames in top-down global screen coordinates.
//!
//! Quartz event taps report locations in the "global display" coordinate
//! space: the origin is the top-left corner of the primary display and Y
//! grows downward.  Displays arranged above the primary one therefore have
//! negative Y coordinates.  All types in this crate use that convention.

/// A position in top-down global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The frame of a display in top-down global coordinates.
///
/// For the primary display `x` and `y` are always `0.0`; the fields exist
/// so that a frame can be compared and logged as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayFrame {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns `true` if `x` lies within the frame's horizontal extent.
    pub fn spans_x(&self, x: f64) -> bool {
        x >= self.x && x < self.right()
    }

    /// Returns `true` if the frame has a positive, finite area.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
