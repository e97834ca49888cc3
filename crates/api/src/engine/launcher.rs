//! Launches article generation runs in the background.
//!
//! Every run is spawned on a [`TaskTracker`] so shutdown can wait for
//! in-flight runs. A semaphore caps how many runs call the model at once;
//! runs over the cap wait in the queued state until a slot frees up.

use std::sync::Arc;
use std::time::Duration;

use copypanda_core::types::DbId;
use copypanda_db::repositories::ArticleRepo;
use copypanda_events::RunReporter;
use copypanda_pipeline::run::execute_run;
use copypanda_pipeline::{ArticlePipeline, GenerationRequest};
use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

/// Failure recorded for runs that never got a slot before shutdown.
const SHUTDOWN_MESSAGE: &str = "Server shut down before the run started";

pub struct RunLauncher {
    pool: PgPool,
    pipeline: Arc<ArticlePipeline>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
}

impl RunLauncher {
    pub fn new(pool: PgPool, pipeline: ArticlePipeline, max_concurrent_runs: usize) -> Self {
        Self {
            pool,
            pipeline: Arc::new(pipeline),
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn the run for `article_id`. Returns immediately.
    pub fn launch(&self, reporter: RunReporter, article_id: DbId, request: GenerationRequest) {
        let pool = self.pool.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let permits = Arc::clone(&self.permits);

        self.tracker.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!(article_id, "Run dropped during shutdown");
                    reporter.fail(SHUTDOWN_MESSAGE);
                    if let Err(e) = ArticleRepo::fail(&pool, article_id, SHUTDOWN_MESSAGE).await {
                        tracing::error!(article_id, error = %e, "Failed to mark article failed");
                    }
                    return;
                }
            };

            if let Err(e) = execute_run(&pool, &pipeline, &reporter, article_id, &request).await {
                tracing::warn!(article_id, error = %e, "Run finished with an error");
            }
        });
    }

    /// Number of runs spawned and not yet finished.
    pub fn active_runs(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting queued work and wait up to `timeout` for running
    /// generations to finish.
    ///
    /// Runs still waiting for a slot are failed right away. Returns `true`
    /// if every run finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.permits.close();
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok()
    }
}
