//! Infrastructure layer for menubar-guard.
//!
//! Contains OS-facing adapters: the Quartz event tap host, cursor warping,
//! primary display queries, and TOML configuration storage.

pub mod event_tap;
pub mod screen_info;
pub mod storage;
