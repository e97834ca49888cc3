//! Stage generators.
//!
//! Each stage builds its prompt, calls the text generator once and prefixes
//! the reply with the stage heading. Every stage reports failure the same
//! way; what happens next is up to the coordinator.

use copypanda_llm::{CompletionRequest, TextGenerator};

use crate::error::{GenerationError, Stage};
use crate::prompts;
use crate::request::GenerationRequest;

/// Generates the individual parts of one article.
pub struct StageGenerator<'a> {
    generator: &'a dyn TextGenerator,
    request: &'a GenerationRequest,
}

impl<'a> StageGenerator<'a> {
    pub fn new(generator: &'a dyn TextGenerator, request: &'a GenerationRequest) -> Self {
        Self { generator, request }
    }

    pub async fn introduction(&self) -> Result<String, GenerationError> {
        self.write(Stage::Introduction, prompts::introduction(self.request))
            .await
    }

    /// Body section `index` (1-based) with a target of `words` words.
    pub async fn section(
        &self,
        index: usize,
        title: &str,
        words: u32,
    ) -> Result<String, GenerationError> {
        let stage = Stage::Section {
            index,
            title: title.to_string(),
        };
        self.write(stage, prompts::section(self.request, title, words))
            .await
    }

    pub async fn conclusion(&self) -> Result<String, GenerationError> {
        self.write(Stage::Conclusion, prompts::conclusion(self.request))
            .await
    }

    pub async fn faq(&self) -> Result<String, GenerationError> {
        self.write(Stage::Faq, prompts::faq(self.request)).await
    }

    pub async fn summary(&self) -> Result<String, GenerationError> {
        self.write(Stage::Summary, prompts::summary(self.request))
            .await
    }

    async fn write(&self, stage: Stage, prompt: String) -> Result<String, GenerationError> {
        let completion = CompletionRequest::prompt(prompts::writer_prompt(&prompt))
            .with_system(prompts::WRITER_SYSTEM);

        tracing::debug!(%stage, model = self.generator.model_name(), "Generating stage");
        match self.generator.generate(&completion).await {
            Ok(text) => Ok(with_heading(&stage, &self.request.title, &text)),
            Err(source) => Err(GenerationError::new(stage, source)),
        }
    }
}

/// Prefix `body` with the heading of `stage`, if it has one.
pub fn with_heading(stage: &Stage, article_title: &str, body: &str) -> String {
    match stage.heading(article_title) {
        Some(heading) => format!("{heading}\n\n{body}"),
        None => body.to_string(),
    }
}
