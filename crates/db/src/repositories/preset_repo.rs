//! Repository for the `presets` table and its four sub-record tables.
//!
//! Writes run in a single transaction so a preset never exists without its
//! format, length, style and options rows. Deleting the `presets` row
//! cascades to all of them.

use copypanda_core::params::ParameterSet;
use copypanda_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::preset::{PresetDetailRow, PresetWithParameters, SavePreset};

/// Joined column list producing a [`PresetDetailRow`].
const DETAIL_SELECT: &str = "\
    SELECT p.id, p.user_id, p.name, \
           f.subheadings, f.bullet_points, f.numbered_list, \
           l.short, l.medium, l.long, l.super_long, \
           s.content_tone, s.writing_style, \
           o.faq_sections, o.summary, \
           p.created_at, p.updated_at \
    FROM presets p \
    JOIN preset_formats f ON f.preset_id = p.id \
    JOIN preset_lengths l ON l.preset_id = p.id \
    JOIN preset_styles s ON s.preset_id = p.id \
    JOIN preset_options o ON o.preset_id = p.id";

/// Provides CRUD operations for presets.
pub struct PresetRepo;

impl PresetRepo {
    /// Insert a preset and its sub-records, returning the full preset.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &SavePreset,
    ) -> Result<PresetWithParameters, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO presets (user_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await?;

        Self::write_parameters(&mut tx, id, &input.parameters).await?;
        let created = Self::fetch_detail(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(created)
    }

    /// Find a preset by ID, regardless of owner.
    ///
    /// Ownership is checked by the caller.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PresetWithParameters>, sqlx::Error> {
        Self::fetch_detail(pool, id).await
    }

    /// List a user's presets ordered by name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PresetWithParameters>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE p.user_id = $1 ORDER BY p.name ASC, p.id ASC");
        let rows = sqlx::query_as::<_, PresetDetailRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(convert).collect()
    }

    /// Replace the name and every sub-record of a preset.
    ///
    /// Returns `None` if the preset does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SavePreset,
    ) -> Result<Option<PresetWithParameters>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("UPDATE presets SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        Self::write_parameters(&mut tx, id, &input.parameters).await?;
        let updated = Self::fetch_detail(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Hard-delete a preset by ID. Sub-records are removed by cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM presets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_detail<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<PresetWithParameters>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, PresetDetailRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .map(convert)
            .transpose()
    }

    /// Upsert all four sub-records of a preset.
    async fn write_parameters(
        tx: &mut Transaction<'_, Postgres>,
        preset_id: DbId,
        params: &ParameterSet,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO preset_formats (preset_id, subheadings, bullet_points, numbered_list) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (preset_id) DO UPDATE SET \
                subheadings = EXCLUDED.subheadings, \
                bullet_points = EXCLUDED.bullet_points, \
                numbered_list = EXCLUDED.numbered_list",
        )
        .bind(preset_id)
        .bind(params.format.subheadings)
        .bind(params.format.bullet_points)
        .bind(params.format.numbered_list)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO preset_lengths (preset_id, short, medium, long, super_long) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (preset_id) DO UPDATE SET \
                short = EXCLUDED.short, \
                medium = EXCLUDED.medium, \
                long = EXCLUDED.long, \
                super_long = EXCLUDED.super_long",
        )
        .bind(preset_id)
        .bind(params.length.short)
        .bind(params.length.medium)
        .bind(params.length.long)
        .bind(params.length.super_long)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO preset_styles (preset_id, content_tone, writing_style) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (preset_id) DO UPDATE SET \
                content_tone = EXCLUDED.content_tone, \
                writing_style = EXCLUDED.writing_style",
        )
        .bind(preset_id)
        .bind(params.style.content_tone.as_str())
        .bind(params.style.writing_style.as_str())
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO preset_options (preset_id, faq_sections, summary) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (preset_id) DO UPDATE SET \
                faq_sections = EXCLUDED.faq_sections, \
                summary = EXCLUDED.summary",
        )
        .bind(preset_id)
        .bind(params.options.faq_sections)
        .bind(params.options.summary)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Convert a joined row, reporting unknown stored enum values as decode errors.
fn convert(row: PresetDetailRow) -> Result<PresetWithParameters, sqlx::Error> {
    PresetWithParameters::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
