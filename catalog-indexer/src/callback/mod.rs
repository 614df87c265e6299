//! Run progress callbacks.
//!
//! A reindex run reports its progress through an injected callback. The
//! events are fire-and-forget notifications for observability; nothing a
//! callback does influences the orchestration.

use tracing::{error, info};

/// Receives progress events from a reindex run.
///
/// `on_error` reports both per-item problems (a manifest that failed to
/// fetch) and the single fatal error of a failed run; `on_complete` fires
/// exactly once, at the end of a successful run.
pub trait ReindexCallback: Send + Sync {
    /// A progress milestone was reached.
    fn on_progress(&self, message: &str);

    /// Something went wrong; the run may or may not continue.
    fn on_error(&self, message: &str);

    /// The run finished successfully.
    fn on_complete(&self, message: &str);
}

/// Callback that routes every event to the log.
pub struct LogCallback;

impl ReindexCallback for LogCallback {
    fn on_progress(&self, message: &str) {
        info!(target: "reindex", "{}", message);
    }

    fn on_error(&self, message: &str) {
        error!(target: "reindex", "{}", message);
    }

    fn on_complete(&self, message: &str) {
        info!(target: "reindex", "{}", message);
    }
}
