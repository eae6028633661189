//! Clamp policy: how the engine reacts to events inside the forbidden band.
//!
//! Two behaviours exist in the wild and both are expressible here:
//!
//! - **Strict** ([`ClampPolicy::strict`]): every mouse event is inspected.
//!   Entering the band warps the cursor to the band edge *once*, motion is
//!   rewritten onto the band edge, and clicks/drags inside the band are
//!   dropped.
//! - **Lenient** ([`ClampPolicy::lenient`]): only motion and drags are
//!   inspected; the cursor is warped back on *every* in-band event and all
//!   events are forwarded untouched.  Repeated warping makes the cursor
//!   flicker, so strict is the default.
//!
//! Individual fields can be mixed freely, e.g. strict relocation with click
//! suppression switched off.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::band::{BandSpan, ForbiddenBand};
use super::event::{EventMask, PointerEventKind};

/// Errors raised when a policy is validated.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("band height must not be negative, got {0}")]
    NegativeBandHeight(f64),

    #[error("band height must be a finite number")]
    NonFiniteBandHeight,
}

/// Named starting points for a [`ClampPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    #[default]
    Strict,
    Lenient,
}

/// The complete, immutable configuration of the clamp engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampPolicy {
    /// Height of the forbidden band in points, measured from the top edge.
    pub band_height: f64,
    /// Horizontal extent of the band.
    pub span: BandSpan,
    /// Drop button presses, releases and drags inside the band.
    pub suppress_clicks: bool,
    /// Warp the cursor only when it first enters the band.
    pub one_shot_relocation: bool,
    /// Inspect motion and drags only; everything else passes untouched.
    pub track_motion_only: bool,
    /// Rewrite forwarded in-band events onto the band edge.
    pub rewrite_position: bool,
}

impl ClampPolicy {
    /// Band height used when nothing else is configured.
    pub const DEFAULT_BAND_HEIGHT: f64 = 15.0;

    pub fn strict(band_height: f64) -> Self {
        Self {
            band_height,
            span: BandSpan::default(),
            suppress_clicks: true,
            one_shot_relocation: true,
            track_motion_only: false,
            rewrite_position: true,
        }
    }

    pub fn lenient(band_height: f64) -> Self {
        Self {
            band_height,
            span: BandSpan::default(),
            suppress_clicks: false,
            one_shot_relocation: false,
            track_motion_only: true,
            rewrite_position: false,
        }
    }

    pub fn from_preset(preset: PolicyPreset, band_height: f64) -> Self {
        match preset {
            PolicyPreset::Strict => Self::strict(band_height),
            PolicyPreset::Lenient => Self::lenient(band_height),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: BandSpan) -> Self {
        self.span = span;
        self
    }

    /// Checks the band height precondition.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NonFiniteBandHeight`] for NaN or infinite
    /// heights and [`PolicyError::NegativeBandHeight`] for heights below zero.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.band_height.is_finite() {
            return Err(PolicyError::NonFiniteBandHeight);
        }
        if self.band_height < 0.0 {
            return Err(PolicyError::NegativeBandHeight(self.band_height));
        }
        Ok(())
    }

    /// Builds the forbidden band described by this policy.
    pub fn band(&self) -> ForbiddenBand {
        ForbiddenBand::new(self.band_height, self.span)
    }

    /// The event kinds the tap must subscribe to for this policy.
    pub fn events_of_interest(&self) -> EventMask {
        let kinds = PointerEventKind::MOUSE_KINDS.into_iter();
        if self.track_motion_only {
            EventMask::from_kinds(kinds.filter(|kind| kind.is_motion_or_drag()))
        } else {
            EventMask::from_kinds(kinds)
        }
    }
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self::strict(Self::DEFAULT_BAND_HEIGHT)
    }
}
