//! Article submission payloads and their validation rules.
//!
//! Validation runs before any row is written or any generation stage is
//! started; failures surface as [`CoreError::Validation`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

/// Default number of suggested section titles.
pub const DEFAULT_SUGGESTION_COUNT: u32 = 5;

/// One body section requested by the user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SectionInput {
    #[validate(length(min = 1, max = 190, message = "Section title must be 1-190 characters"))]
    pub title: String,
}

/// Request body for `POST /articles`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitArticle {
    #[validate(length(min = 1, max = 190, message = "Title must be 1-190 characters"))]
    pub title: String,
    pub context: Option<String>,
    #[validate(
        length(min = 1, max = 10, message = "Between 1 and 10 sections are required"),
        nested
    )]
    pub sections: Vec<SectionInput>,
    pub preset_id: Option<DbId>,
}

impl SubmitArticle {
    /// Check every field rule, collapsing failures into one validation error.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Section titles in submission order.
    pub fn section_titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }

    /// Context with blank strings treated as absent.
    pub fn context(&self) -> Option<String> {
        normalize_context(self.context.as_deref())
    }
}

/// Request body for `POST /articles/sections/suggest`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuggestSections {
    #[validate(length(min = 1, max = 190, message = "Title must be 1-190 characters"))]
    pub title: String,
    pub context: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Count must be between 1 and 10"))]
    #[serde(default = "default_suggestion_count")]
    pub count: u32,
}

impl SuggestSections {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

fn default_suggestion_count() -> u32 {
    DEFAULT_SUGGESTION_COUNT
}

/// Trim a context string, mapping empty input to `None`.
pub fn normalize_context(context: Option<&str>) -> Option<String> {
    context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
