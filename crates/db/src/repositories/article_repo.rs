//! Repository for the `articles` table.
//!
//! An article is created in `running` state and receives exactly one
//! terminal write: [`ArticleRepo::complete`] or [`ArticleRepo::fail`].
//! Both only touch rows that are still running.

use copypanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::article::Article;
use crate::models::status::ArticleStatus;

/// Column list for `articles` queries.
const COLUMNS: &str = "\
    id, user_id, title, content, status_id, error_message, created_at, updated_at";

/// Provides CRUD operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article in `running` state, returning the created row.
    pub async fn create(pool: &PgPool, user_id: DbId, title: &str) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (user_id, title, status_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(user_id)
            .bind(title)
            .bind(ArticleStatus::Running.id())
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's articles, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Store the final content and mark the article completed.
    ///
    /// Returns `None` when the article does not exist or already left the
    /// `running` state.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles \
             SET content = $2, status_id = $3, error_message = NULL \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(content)
            .bind(ArticleStatus::Completed.id())
            .bind(ArticleStatus::Running.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a running article as failed, recording the reason.
    ///
    /// Content is left untouched (no partial content is ever stored).
    pub async fn fail(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles \
             SET status_id = $3, error_message = $2 \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(error_message)
            .bind(ArticleStatus::Failed.id())
            .bind(ArticleStatus::Running.id())
            .fetch_optional(pool)
            .await
    }

    /// Fail every article still marked running.
    ///
    /// Called once at startup: runs live in-process, so a running row at
    /// boot belongs to a run that died with the previous process.
    pub async fn fail_stale_running(pool: &PgPool, error_message: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE articles SET status_id = $1, error_message = $2 WHERE status_id = $3",
        )
        .bind(ArticleStatus::Failed.id())
        .bind(error_message)
        .bind(ArticleStatus::Running.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
