//! In-crate fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use copypanda_core::params::ParameterSet;
use copypanda_core::progress::keys;
use copypanda_llm::{CompletionRequest, LlmError, TextGenerator};
use serde_json::Value;

use crate::prompts::EDITOR_DRAFT_PREFIX;
use crate::reporter::ProgressReporter;
use crate::request::GenerationRequest;

pub const WRITER_REPLY: &str = "Generated paragraph.";

pub fn request(sections: &[&str]) -> GenerationRequest {
    GenerationRequest {
        title: "Benefits of Remote Work".into(),
        context: None,
        sections: sections.iter().map(|s| s.to_string()).collect(),
        parameters: ParameterSet::default(),
    }
}

/// Scripted [`TextGenerator`].
///
/// Writer prompts get [`WRITER_REPLY`]; the editor echoes the draft unless
/// an editor reply is configured.
#[derive(Default)]
pub struct FakeGenerator {
    calls: Mutex<Vec<CompletionRequest>>,
    fail_pattern: Option<String>,
    reply: Option<String>,
    editor_reply: Option<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request whose system or user prompt contains `pattern`.
    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.fail_pattern = Some(pattern.to_string());
        self
    }

    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = Some(reply.to_string());
        self
    }

    pub fn with_editor_reply(mut self, reply: &str) -> Self {
        self.editor_reply = Some(reply.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let system = request.system.as_deref().unwrap_or_default();
        let user = request.last_user_message().unwrap_or_default();

        if let Some(pattern) = &self.fail_pattern {
            if system.contains(pattern.as_str()) || user.contains(pattern.as_str()) {
                return Err(LlmError::Api {
                    status: 500,
                    body: "boom".into(),
                });
            }
        }

        if let Some(draft) = user.strip_prefix(EDITOR_DRAFT_PREFIX) {
            return Ok(self
                .editor_reply
                .clone()
                .unwrap_or_else(|| draft.to_string()));
        }

        Ok(self.reply.clone().unwrap_or_else(|| WRITER_REPLY.to_string()))
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

/// Records every published field in order.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingReporter {
    pub fn values(&self, key: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.values(keys::PROGRESS)
            .iter()
            .filter_map(Value::as_f64)
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.values(keys::STATUS)
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn publish(&self, key: &str, value: Value) {
        self.events.lock().unwrap().push((key.to_string(), value));
    }
}
