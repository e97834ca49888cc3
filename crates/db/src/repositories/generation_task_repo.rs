//! Repository for the `generation_tasks` table.

use copypanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::generation_task::{CreateGenerationTask, GenerationTask};

const COLUMNS: &str = "id, article_id, run_id, public_token, created_at, updated_at";

/// Stores the run handle attached to each article.
pub struct GenerationTaskRepo;

impl GenerationTaskRepo {
    /// Insert a run handle, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationTask,
    ) -> Result<GenerationTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_tasks (article_id, run_id, public_token) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationTask>(&query)
            .bind(input.article_id)
            .bind(&input.run_id)
            .bind(&input.public_token)
            .fetch_one(pool)
            .await
    }

    /// Find the run handle of an article.
    pub async fn find_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Option<GenerationTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_tasks WHERE article_id = $1");
        sqlx::query_as::<_, GenerationTask>(&query)
            .bind(article_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a run handle by its run identifier.
    pub async fn find_by_run_id(
        pool: &PgPool,
        run_id: &str,
    ) -> Result<Option<GenerationTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_tasks WHERE run_id = $1");
        sqlx::query_as::<_, GenerationTask>(&query)
            .bind(run_id)
            .fetch_optional(pool)
            .await
    }
}
