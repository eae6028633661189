//! Application layer use cases for menubar-guard.
//!
//! Use cases in this layer orchestrate the pure [`guard_core`] engine and
//! reach the OS only through traits, so every decision path can be tested
//! with recording doubles on any platform.
//!
//! # Sub-modules
//!
//! - **`clamp_pointer`** – The [`clamp_pointer::PointerClampFilter`]: runs the
//!   clamp engine on every event delivered by the tap, warps the cursor,
//!   re-enables a revoked tap, and keeps counters.  This runs on every mouse
//!   event system-wide, so it never blocks and never allocates.
//!
//! - **`watch_display`** – Periodically re-queries the primary display frame
//!   so the band follows resolution and arrangement changes.
//!
//! - **`supervise`** – Runs an event tap host on a blocking thread until it
//!   stops on its own or a shutdown signal arrives.

pub mod clamp_pointer;
pub mod supervise;
pub mod watch_display;
