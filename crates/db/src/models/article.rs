//! Article and generation-task models.

use copypanda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{ArticleStatus, StatusId};

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    /// Lifecycle status, or `None` for an id missing from the lookup table.
    pub fn status(&self) -> Option<ArticleStatus> {
        ArticleStatus::from_id(self.status_id)
    }

    pub fn is_running(&self) -> bool {
        self.status() == Some(ArticleStatus::Running)
    }
}
