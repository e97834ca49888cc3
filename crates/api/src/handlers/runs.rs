//! Handlers for reading run status by run id and public token.
//!
//! These routes need no bearer token: the public token minted at submission
//! is the credential.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use copypanda_core::progress::{self, keys};
use copypanda_core::tokens::tokens_match;
use copypanda_db::models::article::Article;
use copypanda_db::models::status::ArticleStatus;
use copypanda_db::repositories::{ArticleRepo, GenerationTaskRepo};
use copypanda_events::{AttachError, RunSnapshot, RunState};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// `?token=` query parameter carrying the run's public token.
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: String,
}

// ---------------------------------------------------------------------------
// GET /runs/{run_id}
// ---------------------------------------------------------------------------

/// Latest snapshot of a run.
///
/// Falls back to the stored article once the live channel has been evicted.
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    Query(params): Query<TokenParams>,
) -> AppResult<impl IntoResponse> {
    let snapshot = match state.registry.snapshot(&run_id, &params.token).await {
        Ok(snapshot) => snapshot,
        Err(AttachError::UnknownRun(_)) => stored_snapshot(&state, &run_id, &params.token).await?,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(DataResponse { data: snapshot }))
}

async fn stored_snapshot(state: &AppState, run_id: &str, token: &str) -> AppResult<RunSnapshot> {
    let unknown = || AppError::Run(AttachError::UnknownRun(run_id.to_string()));

    let task = GenerationTaskRepo::find_by_run_id(&state.pool, run_id)
        .await?
        .ok_or_else(unknown)?;
    if !tokens_match(&task.public_token, token) {
        return Err(AttachError::InvalidToken.into());
    }
    let article = ArticleRepo::find_by_id(&state.pool, task.article_id)
        .await?
        .ok_or_else(unknown)?;

    Ok(snapshot_from_article(run_id, &article))
}

/// Rebuild a snapshot from the persisted article.
fn snapshot_from_article(run_id: &str, article: &Article) -> RunSnapshot {
    let mut metadata = Map::new();
    metadata.insert(keys::ARTICLE_TITLE.into(), Value::from(article.title.as_str()));

    let state = match article.status() {
        Some(ArticleStatus::Completed) => {
            metadata.insert(keys::STATUS.into(), progress::STATUS_COMPLETED.into());
            metadata.insert(keys::PROGRESS.into(), progress::DONE.into());
            RunState::Completed
        }
        Some(ArticleStatus::Failed) | None => {
            metadata.insert(keys::STATUS.into(), progress::STATUS_FAILED.into());
            RunState::Failed
        }
        Some(ArticleStatus::Running) => RunState::Executing,
    };

    RunSnapshot {
        run_id: run_id.to_string(),
        state,
        metadata,
        error: article.error_message.clone(),
        updated_at: article.updated_at,
    }
}
