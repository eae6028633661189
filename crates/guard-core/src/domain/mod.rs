//! Domain entities for menubar-guard.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies.  It can be compiled and tested on any platform; the macOS
//! event tap in the `menubar-guard` crate converts Quartz events into
//! [`event::PointerEvent`] values and applies the [`clamp::Verdict`] it gets
//! back.
//!
//! Code in outer layers depends on the domain, but the domain never depends
//! on them.

pub mod band;
pub mod clamp;
pub mod event;
pub mod geometry;
pub mod policy;
