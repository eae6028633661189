//! The forbidden band: a strip along the top edge of the primary display.
//!
//! The band covers `0 <= y < height` in top-down coordinates.  The lower
//! bound matters: displays arranged *above* the primary display have
//! negative Y coordinates, and the cursor must stay free to travel there.
//!
//! Horizontally the band covers every X coordinate by default
//! ([`BandSpan::FullWidth`]), or only the primary display's width
//! ([`BandSpan::PrimaryDisplay`]).  The height is fixed for the lifetime of the
//! band; only the display frame backing the horizontal span can be refreshed.

use serde::{Deserialize, Serialize};

use super::geometry::{DisplayFrame, Point};

/// Horizontal extent of the forbidden band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandSpan {
    /// Any X coordinate is restricted, including side-by-side displays whose
    /// top edge lines up with the primary display.
    #[default]
    FullWidth,
    /// Only the width of the primary display is restricted.
    PrimaryDisplay,
}

/// The region of the screen the cursor is kept out of.
#[derive(Debug, Clone, PartialEq)]
pub struct ForbiddenBand {
    height: f64,
    span: BandSpan,
    /// Primary display frame; `None` until the display has been queried.
    display: Option<DisplayFrame>,
}

impl ForbiddenBand {
    /// Creates a band of `height` pixels with the given horizontal span.
    ///
    /// Until [`set_display_frame`](Self::set_display_frame) is called a
    /// [`BandSpan::PrimaryDisplay`] band behaves like a full-width band.
    pub fn new(height: f64, span: BandSpan) -> Self {
        Self {
            height,
            span,
            display: None,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Replaces the primary display frame used for the horizontal span.
    pub fn set_display_frame(&mut self, frame: DisplayFrame) {
        self.display = Some(frame);
    }

    /// Returns `true` if `point` lies inside the band.
    ///
    /// The bottom edge is exclusive: `y == height` is outside.
    pub fn contains(&self, point: Point) -> bool {
        if !(point.y >= 0.0 && point.y < self.height) {
            return false;
        }
        match (self.span, self.display) {
            (BandSpan::FullWidth, _) | (BandSpan::PrimaryDisplay, None) => true,
            (BandSpan::PrimaryDisplay, Some(frame)) => frame.spans_x(point.x),
        }
    }

    /// Returns the point directly below `point` on the band's bottom edge.
    ///
    /// X is never altered.
    pub fn clamp_target(&self, point: Point) -> Point {
        Point::new(point.x, self.height)
    }

    /// Returns `true` if the band would swallow the whole display.
    pub fn covers_display(&self) -> bool {
        self.display
            .map(|frame| self.height >= frame.height)
            .unwrap_or(false)
    }
}
