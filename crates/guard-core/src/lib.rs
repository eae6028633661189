//! # guard-core
//!
//! Pure domain logic for menubar-guard: the forbidden band at the top of the
//! primary display, the clamp policy, pointer event classification, and the
//! clamp engine that turns each pointer event into a forwarding decision.
//!
//! This crate has zero dependencies on OS APIs.  Everything that touches
//! Quartz (event taps, cursor warping, display queries) lives in the
//! `menubar-guard` crate and feeds plain values into the types defined here.
//!
//! # Architecture overview (for beginners)
//!
//! The macOS menu bar (and on newer laptops, the camera notch) sits in a thin
//! strip along the top edge of the main display.  menubar-guard keeps the
//! cursor out of that strip by watching every mouse event system-wide and
//! deciding, per event, whether to let it through, move it, or drop it.
//!
//! - **`domain::geometry`** – points and display frames in top-down
//!   coordinates (origin at the top-left of the primary display).
//!
//! - **`domain::band`** – the forbidden band itself and the clamp target for
//!   a point that strays into it.
//!
//! - **`domain::event`** – pointer event kinds, using the same numeric type
//!   codes as Quartz so the OS layer can convert with a plain integer.
//!
//! - **`domain::policy`** – the strict and lenient behaviours, unified as one
//!   configurable [`ClampPolicy`].
//!
//! - **`domain::clamp`** – the [`ClampEngine`] state machine that produces a
//!   [`Verdict`] for every event without performing any side effects.

pub mod domain;

pub use domain::band::{BandSpan, ForbiddenBand};
pub use domain::clamp::{ClampEngine, ContainmentState, Decision, Verdict};
pub use domain::event::{EventMask, MouseButton, PointerEvent, PointerEventKind};
pub use domain::geometry::{DisplayFrame, Point};
pub use domain::policy::{ClampPolicy, PolicyError, PolicyPreset};
