use copypanda_events::RunReporter;
use serde_json::Value;

/// Sink for the progress fields published while an article is generated.
pub trait ProgressReporter: Send + Sync {
    fn publish(&self, key: &str, value: Value);
}

impl ProgressReporter for RunReporter {
    fn publish(&self, key: &str, value: Value) {
        self.set(key, value);
    }
}
