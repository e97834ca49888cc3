//! Handlers for generation parameter presets.
//!
//! Every operation is scoped to the authenticated user: reading or changing
//! another user's preset is refused with 403.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use copypanda_core::error::CoreError;
use copypanda_core::preset;
use copypanda_core::types::DbId;
use copypanda_db::models::preset::{PresetWithParameters, SavePreset};
use copypanda_db::repositories::PresetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a preset and check that `user_id` owns it.
pub(crate) async fn ensure_owned_preset(
    pool: &sqlx::PgPool,
    id: DbId,
    user_id: DbId,
) -> AppResult<PresetWithParameters> {
    let preset = PresetRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Preset",
            id,
        })
    })?;
    if preset.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Preset belongs to another user".into(),
        )));
    }
    Ok(preset)
}

// ---------------------------------------------------------------------------
// GET /presets
// ---------------------------------------------------------------------------

/// List the authenticated user's presets.
pub async fn list_presets(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = PresetRepo::list_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(count = items.len(), "Listed presets");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /presets
// ---------------------------------------------------------------------------

pub async fn create_preset(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SavePreset>,
) -> AppResult<impl IntoResponse> {
    preset::validate_preset_name(&input.name)?;

    let created = PresetRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Preset created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /presets/{id}
// ---------------------------------------------------------------------------

pub async fn get_preset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let preset = ensure_owned_preset(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: preset }))
}

// ---------------------------------------------------------------------------
// PUT /presets/{id}
// ---------------------------------------------------------------------------

/// Replace a preset's name and all of its parameters.
pub async fn update_preset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SavePreset>,
) -> AppResult<impl IntoResponse> {
    preset::validate_preset_name(&input.name)?;
    ensure_owned_preset(&state.pool, id, auth.user_id).await?;

    let updated = PresetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Preset",
            id,
        }))?;
    tracing::info!(id, "Preset updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /presets/{id}
// ---------------------------------------------------------------------------

/// Delete a preset together with its format, length, style and options rows.
pub async fn delete_preset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_preset(&state.pool, id, auth.user_id).await?;

    if PresetRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "Preset deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Preset",
            id,
        }))
    }
}
