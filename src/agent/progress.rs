//! Progress reporting for pipeline runs.
//!
//! The orchestrator emits keyed progress updates as searches start,
//! finish, get revised, or fail. Sinks decide what to do with them:
//! log them, render them, or ignore them. A key identifies one search
//! slot for its whole lifetime, so a revision updates the same line.

use std::fmt::Debug;

use tracing::info;

/// Receives progress updates from a pipeline run.
///
/// Implementations must be cheap and non-blocking; the orchestrator
/// calls them from its hot path.
pub trait ProgressSink: Send + Sync + Debug {
    /// Reports the current state of a search slot.
    ///
    /// `key` is stable across the slot's lifetime (initial search,
    /// critique, revision). `done` marks the slot's terminal update.
    fn on_update(&self, key: &str, message: &str, done: bool);

    /// Marks the whole run as finished.
    fn on_finish(&self, message: &str);
}

/// Sink that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_update(&self, _key: &str, _message: &str, _done: bool) {}

    fn on_finish(&self, _message: &str) {}
}

/// Sink that forwards updates to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_update(&self, key: &str, message: &str, done: bool) {
        info!(key, done, "{message}");
    }

    fn on_finish(&self, message: &str) {
        info!("{message}");
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;

    #[test]
    fn test_null_sink_ignores_updates() {
        let sink = NullSink;
        sink.on_update("search-0", "searching", false);
        sink.on_finish("done");
    }

    #[test]
    fn test_recording_sink_captures_order() {
        let sink = RecordingSink::default();
        sink.on_update("search-0", "searching", false);
        sink.on_update("search-0", "accepted", true);

        let updates = sink.updates.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].0, "search-0");
        assert!(!updates[0].2);
        assert!(updates[1].2);
    }
}
