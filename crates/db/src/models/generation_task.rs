//! Handle of the background run that produces an article.

use copypanda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `generation_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationTask {
    pub id: DbId,
    pub article_id: DbId,
    pub run_id: String,
    pub public_token: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a run handle.
#[derive(Debug, Clone)]
pub struct CreateGenerationTask {
    pub article_id: DbId,
    pub run_id: String,
    pub public_token: String,
}
