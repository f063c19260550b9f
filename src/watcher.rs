//! Live directory watching and sorting.
//!
//! Watch mode subscribes to filesystem notifications for a single
//! directory (non-recursively) and runs every newly arrived file through
//! the same classify-then-move step as the one-shot scanner, after a
//! fixed settle delay. The delay gives the writing process a chance to
//! finish; it is explicitly best-effort and does not inspect file sizes
//! or locks, so a large file still being written can outlast it.
//!
//! Events are drained from a channel one at a time, in arrival order, by
//! a single consumer. Per-file failures are logged and never stop the
//! watch; only a failure of the notification source itself ends the run.

use crate::config::SortPlan;
use crate::organizer;
use crate::output::OutputFormatter;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// How often the event loop wakes up to check the stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Errors from the filesystem notification source.
///
/// All of these are fatal for watch mode; per-file move failures are not
/// represented here because they are contained inside the event loop.
#[derive(Debug)]
pub enum WatchError {
    /// The notification backend could not be initialized.
    WatcherInitFailed { source: notify::Error },
    /// The base directory could not be registered for watching.
    WatchTargetFailed {
        path: PathBuf,
        source: notify::Error,
    },
    /// The notification source reported a delivery failure.
    EventStreamFailed { source: notify::Error },
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WatcherInitFailed { source } => {
                write!(f, "Failed to start filesystem watcher: {}", source)
            }
            Self::WatchTargetFailed { path, source } => {
                write!(f, "Failed to watch {}: {}", path.display(), source)
            }
            Self::EventStreamFailed { source } => {
                write!(f, "Filesystem watcher failed: {}", source)
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// Result type for watch mode.
pub type WatchResult<T> = Result<T, WatchError>;

/// Watches `base_dir` and sorts files as they appear, until `stop` is set.
///
/// Only the directory itself is watched; events from subdirectories are
/// not observed. Creation events and moved-into-the-directory events for
/// non-directory paths trigger handling; everything else is ignored.
///
/// The stop flag is checked between events, so an in-flight move always
/// completes before the function returns. Setting the flag from a Ctrl+C
/// handler gives a graceful shutdown.
///
/// # Errors
///
/// Returns a [`WatchError`] if the notification source fails to start or
/// reports a delivery failure. Per-file move failures are logged and do
/// not end the watch.
pub fn watch(base_dir: &Path, plan: &SortPlan, stop: Arc<AtomicBool>) -> WatchResult<()> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(tx)
        .map_err(|e| WatchError::WatcherInitFailed { source: e })?;
    watcher
        .watch(base_dir, RecursiveMode::NonRecursive)
        .map_err(|e| WatchError::WatchTargetFailed {
            path: base_dir.to_path_buf(),
            source: e,
        })?;

    OutputFormatter::info(&format!(
        "Watching: {} (press Ctrl+C to stop)",
        base_dir.display()
    ));

    while !stop.load(Ordering::SeqCst) {
        match rx.recv_timeout(STOP_POLL_INTERVAL) {
            Ok(Ok(event)) => handle_event(base_dir, plan, &event),
            Ok(Err(e)) => return Err(WatchError::EventStreamFailed { source: e }),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Whether an event kind signals a file arriving in the watched directory.
fn is_arrival(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To))
    )
}

/// Dispatches one notification: filters out directories and ignored
/// files, then handles each remaining path.
fn handle_event(base_dir: &Path, plan: &SortPlan, event: &Event) {
    if !is_arrival(&event.kind) {
        return;
    }

    for path in &event.paths {
        if path.is_dir() {
            continue;
        }
        if !plan.ignore.should_sort(path) {
            continue;
        }
        handle_arrival(base_dir, plan, path);
    }
}

/// Handles one arrived file: settle, classify, move, log.
///
/// Any failure is logged with the file path and contained here; the event
/// loop keeps running.
fn handle_arrival(base_dir: &Path, plan: &SortPlan, path: &Path) {
    thread::sleep(plan.settle_delay);

    // Notifications can be duplicated, or refer to a short-lived temporary
    // that is already gone by the time the settle delay expires.
    if !path.exists() {
        return;
    }

    match organizer::sort_into_place(base_dir, plan, path) {
        Ok(final_path) => OutputFormatter::success(&format!(
            "Moved {} -> {}",
            path.display(),
            final_path.display()
        )),
        Err(e) => OutputFormatter::error(&format!("Failed to move {}: {}", path.display(), e)),
    }
}
