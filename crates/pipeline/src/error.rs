use std::fmt;

use copypanda_core::error::CoreError;
use copypanda_llm::LlmError;

/// A named step of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Introduction,
    /// Body section, `index` is 1-based.
    Section { index: usize, title: String },
    Conclusion,
    Faq,
    Summary,
    Editor,
}

impl Stage {
    /// Markdown heading prefixed to this stage's output.
    ///
    /// The editor produces a whole document and has no heading.
    pub fn heading(&self, article_title: &str) -> Option<String> {
        match self {
            Stage::Introduction => Some(format!("# {article_title}")),
            Stage::Section { title, .. } => Some(format!("## {title}")),
            Stage::Conclusion => Some("## Conclusion".to_string()),
            Stage::Faq => Some("## Frequently Asked Questions".to_string()),
            Stage::Summary => Some("## Summary".to_string()),
            Stage::Editor => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Introduction => f.write_str("introduction"),
            Stage::Section { title, .. } => write!(f, "section '{title}'"),
            Stage::Conclusion => f.write_str("conclusion"),
            Stage::Faq => f.write_str("FAQ section"),
            Stage::Summary => f.write_str("summary"),
            Stage::Editor => f.write_str("editor pass"),
        }
    }
}

/// Failure of a single stage.
#[derive(Debug, thiserror::Error)]
#[error("Failed to generate {stage}: {source}")]
pub struct GenerationError {
    pub stage: Stage,
    #[source]
    pub source: LlmError,
}

impl GenerationError {
    pub fn new(stage: Stage, source: LlmError) -> Self {
        Self { stage, source }
    }
}

/// Failure of a whole pipeline invocation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidRequest(#[from] CoreError),

    #[error(transparent)]
    Stage(#[from] GenerationError),
}

/// Failure of a background run, including its persistence.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
