//! Execution of one background run.
//!
//! A run owns exactly one article row. It generates the content, then
//! performs a single terminal write: [`ArticleRepo::complete`] on success
//! or [`ArticleRepo::fail`] on failure. The run channel is closed with the
//! matching state.

use copypanda_core::progress::{self, keys};
use copypanda_core::types::DbId;
use copypanda_db::repositories::ArticleRepo;
use copypanda_events::RunReporter;
use sqlx::PgPool;

use crate::coordinator::ArticlePipeline;
use crate::error::RunError;
use crate::reporter::ProgressReporter;
use crate::request::GenerationRequest;

/// Generate the article and record the outcome.
#[tracing::instrument(skip_all, fields(article_id = article_id, run_id = %reporter.run_id()))]
pub async fn execute_run(
    pool: &PgPool,
    pipeline: &ArticlePipeline,
    reporter: &RunReporter,
    article_id: DbId,
    request: &GenerationRequest,
) -> Result<(), RunError> {
    reporter.start();

    let content = match pipeline.generate(request, reporter).await {
        Ok(content) => content,
        Err(err) => {
            let message = err.to_string();
            tracing::error!(error = %message, "Article generation failed");
            record_failure(pool, reporter, article_id, &message).await?;
            return Err(err.into());
        }
    };

    match ArticleRepo::complete(pool, article_id, &content).await {
        Ok(Some(_)) => {
            reporter.complete();
            tracing::info!(chars = content.len(), "Article generation completed");
            Ok(())
        }
        Ok(None) => {
            tracing::warn!("Article left the running state before completion");
            reporter.fail("Article is no longer running");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to store generated article");
            reporter.publish(keys::STATUS, progress::STATUS_FAILED.into());
            reporter.fail("Failed to store generated article");
            if let Err(fail_err) =
                ArticleRepo::fail(pool, article_id, "Failed to store generated article").await
            {
                tracing::error!(error = %fail_err, "Failed to mark article failed");
            }
            Err(err.into())
        }
    }
}

async fn record_failure(
    pool: &PgPool,
    reporter: &RunReporter,
    article_id: DbId,
    message: &str,
) -> Result<(), RunError> {
    reporter.publish(keys::STATUS, progress::STATUS_FAILED.into());
    reporter.fail(message);
    ArticleRepo::fail(pool, article_id, message).await?;
    Ok(())
}
