//! Preset models and DTOs.
//!
//! A preset is split across five tables: `presets` plus one row each in
//! `preset_formats`, `preset_lengths`, `preset_styles` and `preset_options`.
//! Reads join them into a [`PresetDetailRow`] which converts into the
//! API-facing [`PresetWithParameters`].

use copypanda_core::error::CoreError;
use copypanda_core::params::{ArticleOptions, FormatFlags, LengthFlags, ParameterSet, StyleParams};
use copypanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Flattened join of a preset and its four sub-records.
#[derive(Debug, Clone, FromRow)]
pub struct PresetDetailRow {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub subheadings: bool,
    pub bullet_points: bool,
    pub numbered_list: bool,
    pub short: bool,
    pub medium: bool,
    pub long: bool,
    pub super_long: bool,
    pub content_tone: String,
    pub writing_style: String,
    pub faq_sections: bool,
    pub summary: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A preset with its resolved parameter set.
#[derive(Debug, Clone, Serialize)]
pub struct PresetWithParameters {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub parameters: ParameterSet,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<PresetDetailRow> for PresetWithParameters {
    type Error = CoreError;

    fn try_from(row: PresetDetailRow) -> Result<Self, Self::Error> {
        let parameters = ParameterSet {
            format: FormatFlags {
                subheadings: row.subheadings,
                bullet_points: row.bullet_points,
                numbered_list: row.numbered_list,
            },
            length: LengthFlags {
                short: row.short,
                medium: row.medium,
                long: row.long,
                super_long: row.super_long,
            },
            style: StyleParams {
                content_tone: row.content_tone.parse()?,
                writing_style: row.writing_style.parse()?,
            },
            options: ArticleOptions {
                faq_sections: row.faq_sections,
                summary: row.summary,
            },
        };

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            parameters,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// DTO for creating a preset or fully replacing an existing one.
///
/// Omitted parameter groups take their default values.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePreset {
    pub name: String,
    #[serde(flatten)]
    pub parameters: ParameterSet,
}
