//! Runs an event tap host on a blocking thread until shutdown.
//!
//! The tap's run loop is synchronous and must own its thread, so the host is
//! moved onto Tokio's blocking pool.  Shutdown clears the shared `running`
//! flag; the host notices it at the end of its current run loop slice and
//! tears the tap down before returning its counters.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::application::clamp_pointer::{FilterStats, PointerClampFilter};
use crate::infrastructure::event_tap::EventTapHost;

/// Drives `host` with `filter` until `shutdown` resolves or the host stops.
///
/// # Errors
///
/// Returns the host's [`TapError`](crate::infrastructure::event_tap::TapError)
/// if the hook could not be installed, or an error if the host thread
/// panicked.
pub async fn supervise<H, F>(
    host: H,
    filter: PointerClampFilter,
    shutdown: F,
) -> anyhow::Result<FilterStats>
where
    H: EventTapHost + Send + 'static,
    F: Future<Output = ()>,
{
    let running = Arc::new(AtomicBool::new(true));
    let host_running = Arc::clone(&running);
    let mut task = tokio::task::spawn_blocking(move || host.run(filter, host_running));

    tokio::pin!(shutdown);
    let joined = tokio::select! {
        res = &mut task => {
            info!("event tap host stopped on its own");
            res
        }
        () = &mut shutdown => {
            info!("shutdown requested, removing event tap");
            running.store(false, Ordering::SeqCst);
            task.await
        }
    };

    let stats = joined.context("event tap thread panicked")??;
    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
