//! Final rewrite pass over the assembled draft.

use copypanda_llm::{CompletionRequest, TextGenerator};

use crate::error::{GenerationError, Stage};
use crate::prompts;
use crate::request::GenerationRequest;

/// Rewrite `draft` according to the request's style, format and length.
///
/// The result replaces the draft entirely.
pub async fn edit(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    draft: &str,
) -> Result<String, GenerationError> {
    let completion = CompletionRequest::prompt(prompts::editor_user(draft))
        .with_system(prompts::editor_system(request));

    tracing::debug!(draft_chars = draft.len(), "Editing draft");
    generator
        .generate(&completion)
        .await
        .map_err(|source| GenerationError::new(Stage::Editor, source))
}
