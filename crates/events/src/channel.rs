//! Watch-channel backed status snapshots for a single run.
//!
//! Readers only ever need the latest state, so each run holds a
//! `tokio::sync::watch` value instead of an event log. A reconnecting client
//! attaches and immediately sees the current snapshot.

use std::sync::Arc;

use chrono::Utc;
use copypanda_core::types::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// RunState / RunSnapshot
// ---------------------------------------------------------------------------

/// Coarse lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Queued,
    Executing,
    Completed,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// Latest published state of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub run_id: String,
    pub state: RunState,
    /// Free-form progress fields (`status`, `progress`, `article_title`, ...).
    pub metadata: Map<String, Value>,
    /// Failure message, set only in [`RunState::Failed`].
    pub error: Option<String>,
    pub updated_at: Timestamp,
}

impl RunSnapshot {
    pub(crate) fn queued(run_id: String, metadata: Map<String, Value>) -> Self {
        Self {
            run_id,
            state: RunState::Queued,
            metadata,
            error: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Current `progress` field, if one has been published.
    pub fn progress(&self) -> Option<f64> {
        self.metadata.get("progress").and_then(Value::as_f64)
    }
}

// ---------------------------------------------------------------------------
// RunReporter
// ---------------------------------------------------------------------------

/// Publisher side of a run channel.
///
/// Cloning is cheap; all clones publish into the same channel. Once the run
/// reaches a terminal state further updates are ignored.
#[derive(Debug, Clone)]
pub struct RunReporter {
    sender: Arc<watch::Sender<RunSnapshot>>,
}

impl RunReporter {
    pub(crate) fn new(sender: Arc<watch::Sender<RunSnapshot>>) -> Self {
        Self { sender }
    }

    pub fn run_id(&self) -> String {
        self.sender.borrow().run_id.clone()
    }

    /// Merge one metadata field into the snapshot.
    pub fn set(&self, key: &str, value: Value) {
        self.sender.send_if_modified(|snap| {
            if snap.is_terminal() {
                return false;
            }
            snap.metadata.insert(key.to_string(), value);
            snap.updated_at = Utc::now();
            true
        });
    }

    /// Move the run from queued to executing.
    pub fn start(&self) {
        self.transition(RunState::Executing, None);
    }

    pub fn complete(&self) {
        self.transition(RunState::Completed, None);
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.transition(RunState::Failed, Some(message.into()));
    }

    /// Current snapshot, mostly useful in tests.
    pub fn snapshot(&self) -> RunSnapshot {
        self.sender.borrow().clone()
    }

    fn transition(&self, state: RunState, error: Option<String>) {
        self.sender.send_if_modified(|snap| {
            if snap.is_terminal() || snap.state == state {
                return false;
            }
            snap.state = state;
            snap.error = error;
            snap.updated_at = Utc::now();
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter() -> (RunReporter, watch::Receiver<RunSnapshot>) {
        let (tx, rx) = watch::channel(RunSnapshot::queued("run_test".into(), Map::new()));
        (RunReporter::new(Arc::new(tx)), rx)
    }

    #[test]
    fn set_merges_metadata() {
        let (reporter, rx) = reporter();
        reporter.set("status", "Generating introduction".into());
        reporter.set("progress", 0.1.into());
        reporter.set("progress", 0.2.into());

        let snap = rx.borrow();
        assert_eq!(snap.metadata["status"], "Generating introduction");
        assert_eq!(snap.progress(), Some(0.2));
        assert_eq!(snap.state, RunState::Queued);
    }

    #[test]
    fn terminal_state_is_final() {
        let (reporter, rx) = reporter();
        reporter.start();
        reporter.fail("model unavailable");
        reporter.complete();
        reporter.set("progress", 1.0.into());

        let snap = rx.borrow();
        assert_eq!(snap.state, RunState::Failed);
        assert_eq!(snap.error.as_deref(), Some("model unavailable"));
        assert_eq!(snap.progress(), None);
    }

    #[tokio::test]
    async fn subscribers_are_woken_on_change() {
        let (reporter, mut rx) = reporter();
        rx.borrow_and_update();

        reporter.start();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().state, RunState::Executing);

        reporter.complete();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_terminal());
    }

    #[test]
    fn snapshot_serializes_state_in_snake_case() {
        let (reporter, _rx) = reporter();
        reporter.start();
        let json = serde_json::to_value(reporter.snapshot()).unwrap();
        assert_eq!(json["state"], "executing");
        assert_eq!(json["run_id"], "run_test");
        assert!(json["error"].is_null());
    }
}
