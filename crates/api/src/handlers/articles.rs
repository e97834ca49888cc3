//! Handlers for article submission and status queries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use copypanda_core::article::{normalize_context, SubmitArticle, SuggestSections};
use copypanda_core::error::CoreError;
use copypanda_core::params::ParameterSet;
use copypanda_core::types::DbId;
use copypanda_db::models::article::Article;
use copypanda_db::models::generation_task::CreateGenerationTask;
use copypanda_db::models::status::ArticleStatus;
use copypanda_db::repositories::{ArticleRepo, GenerationTaskRepo};
use copypanda_events::RunHandle;
use copypanda_pipeline::suggest::suggest_sections;
use copypanda_pipeline::GenerationRequest;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::presets::ensure_owned_preset;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Returned by a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub article_id: DbId,
    pub run_id: String,
    pub public_token: String,
}

/// Persisted article fields plus the run handle while it is still running.
#[derive(Debug, Serialize)]
pub struct ArticleStatusResponse {
    #[serde(flatten)]
    pub article: Article,
    pub status: Option<ArticleStatus>,
    pub run: Option<RunHandle>,
}

/// Verify that an article exists and belongs to `user_id`.
async fn ensure_owned_article(
    pool: &sqlx::PgPool,
    id: DbId,
    user_id: DbId,
) -> AppResult<Article> {
    let article = ArticleRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        })
    })?;
    if article.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Article belongs to another user".into(),
        )));
    }
    Ok(article)
}

// ---------------------------------------------------------------------------
// POST /articles
// ---------------------------------------------------------------------------

/// Validate a submission, store it and start generating in the background.
///
/// Returns as soon as the run is launched; progress is read from the run
/// channel identified by the returned handle.
pub async fn submit_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitArticle>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let parameters = match input.preset_id {
        Some(preset_id) => {
            ensure_owned_preset(&state.pool, preset_id, auth.user_id)
                .await?
                .parameters
        }
        None => ParameterSet::default(),
    };

    let sections = input.section_titles();
    let article = ArticleRepo::create(&state.pool, auth.user_id, &input.title).await?;
    let (handle, reporter) = state.registry.open(&input.title, &sections).await;

    let task = CreateGenerationTask {
        article_id: article.id,
        run_id: handle.run_id.clone(),
        public_token: handle.public_token.clone(),
    };
    if let Err(e) = GenerationTaskRepo::create(&state.pool, &task).await {
        reporter.fail("Failed to record run");
        ArticleRepo::fail(&state.pool, article.id, "Failed to record run").await?;
        return Err(e.into());
    }

    let request = GenerationRequest {
        title: input.title.clone(),
        context: input.context(),
        sections,
        parameters,
    };
    state.launcher.launch(reporter, article.id, request);

    tracing::info!(
        article_id = article.id,
        run_id = %handle.run_id,
        preset_id = ?input.preset_id,
        "Article submitted",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmitResponse {
                article_id: article.id,
                run_id: handle.run_id,
                public_token: handle.public_token,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /articles
// ---------------------------------------------------------------------------

/// List the authenticated user's articles, newest first.
pub async fn list_articles(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = ArticleRepo::list_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(count = items.len(), "Listed articles");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /articles/{id}
// ---------------------------------------------------------------------------

pub async fn get_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_owned_article(&state.pool, id, auth.user_id).await?;

    let run = if article.is_running() {
        GenerationTaskRepo::find_by_article(&state.pool, id)
            .await?
            .map(|task| RunHandle {
                run_id: task.run_id,
                public_token: task.public_token,
            })
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: ArticleStatusResponse {
            status: article.status(),
            article,
            run,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /articles/sections/suggest
// ---------------------------------------------------------------------------

pub async fn suggest(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SuggestSections>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let context = normalize_context(input.context.as_deref());
    let sections = suggest_sections(
        state.generator.as_ref(),
        &input.title,
        context.as_deref(),
        input.count,
    )
    .await?;
    Ok(Json(DataResponse { data: sections }))
}
