//! Registry of live run channels.
//!
//! Designed to be wrapped in `Arc` and shared between the HTTP handlers
//! (which attach subscribers) and the run launcher (which opens channels).
//! Finished channels stay attachable for a retention period and are then
//! evicted by [`RunRegistry::run_eviction`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use copypanda_core::progress::keys;
use copypanda_core::tokens::{generate_public_token, run_id, tokens_match};
use copypanda_core::types::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;

use crate::channel::{RunReporter, RunSnapshot};

/// Default retention of finished runs, in seconds.
pub const DEFAULT_RETENTION_SECS: u64 = 600;

/// Identifier and token a client needs to attach to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunHandle {
    pub run_id: String,
    pub public_token: String,
}

/// Reasons an attach attempt is refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("Run {0} not found")]
    UnknownRun(String),

    #[error("Invalid run access token")]
    InvalidToken,
}

struct RunChannel {
    public_token: String,
    sender: Arc<watch::Sender<RunSnapshot>>,
}

/// Thread-safe map of run id to channel.
pub struct RunRegistry {
    runs: RwLock<HashMap<String, RunChannel>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }

    /// Open a channel for a new run.
    ///
    /// The initial snapshot is queued and already carries the article title
    /// and section list so an early subscriber has something to render.
    pub async fn open(&self, article_title: &str, sections: &[String]) -> (RunHandle, RunReporter) {
        let handle = RunHandle {
            run_id: run_id(uuid::Uuid::new_v4().simple()),
            public_token: generate_public_token(),
        };

        let mut metadata = Map::new();
        metadata.insert(keys::ARTICLE_TITLE.into(), Value::from(article_title));
        metadata.insert(keys::SECTIONS.into(), Value::from(sections.to_vec()));

        let (sender, _) = watch::channel(RunSnapshot::queued(handle.run_id.clone(), metadata));
        let sender = Arc::new(sender);

        self.runs.write().await.insert(
            handle.run_id.clone(),
            RunChannel {
                public_token: handle.public_token.clone(),
                sender: Arc::clone(&sender),
            },
        );
        tracing::debug!(run_id = %handle.run_id, "Run channel opened");

        (handle, RunReporter::new(sender))
    }

    /// Subscribe to a run after checking its public token.
    pub async fn attach(
        &self,
        run_id: &str,
        token: &str,
    ) -> Result<watch::Receiver<RunSnapshot>, AttachError> {
        let runs = self.runs.read().await;
        let channel = runs
            .get(run_id)
            .ok_or_else(|| AttachError::UnknownRun(run_id.to_string()))?;
        if !tokens_match(&channel.public_token, token) {
            return Err(AttachError::InvalidToken);
        }
        Ok(channel.sender.subscribe())
    }

    /// Latest snapshot of a run, with the same checks as [`Self::attach`].
    pub async fn snapshot(&self, run_id: &str, token: &str) -> Result<RunSnapshot, AttachError> {
        let rx = self.attach(run_id, token).await?;
        let snap = rx.borrow().clone();
        Ok(snap)
    }

    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }

    /// Drop finished runs whose last update is older than `cutoff`.
    ///
    /// Returns the number of evicted channels. Live runs are never evicted.
    pub async fn evict_finished_before(&self, cutoff: Timestamp) -> usize {
        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|_, channel| {
            let snap = channel.sender.borrow();
            !(snap.is_terminal() && snap.updated_at < cutoff)
        });
        before - runs.len()
    }

    /// Periodically evict runs finished more than `retention` ago.
    pub async fn run_eviction(
        self: Arc<Self>,
        retention: Duration,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let retention = chrono::Duration::seconds(retention.as_secs() as i64);
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Run eviction cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let cutoff = Utc::now() - retention;
                    let evicted = self.evict_finished_before(cutoff).await;
                    if evicted > 0 {
                        tracing::debug!(evicted, "Evicted finished run channels");
                    }
                }
            }
        }
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new()
    }
}
