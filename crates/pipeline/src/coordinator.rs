//! Pipeline coordinator.
//!
//! Runs the stages strictly in this order:
//!
//! ```text
//! introduction -> sections[1..N] -> conclusion -> FAQ? -> summary? -> editor
//! ```
//!
//! publishing status labels and the fixed progress schedule from
//! [`copypanda_core::progress`] along the way. Body sections may be
//! generated concurrently but are always assembled in request order.

use std::str::FromStr;
use std::sync::Arc;

use copypanda_core::budget::WordBudget;
use copypanda_core::error::CoreError;
use copypanda_core::progress::{self, keys};
use copypanda_llm::TextGenerator;
use futures::{StreamExt, TryStreamExt};

use crate::editor;
use crate::error::{GenerationError, PipelineError};
use crate::reporter::ProgressReporter;
use crate::request::GenerationRequest;
use crate::stages::{with_heading, StageGenerator};

/// Default number of body sections generated at once.
pub const DEFAULT_SECTION_CONCURRENCY: usize = 1;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What the coordinator does when a stage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed stage; the run fails.
    #[default]
    Abort,
    /// Substitute an error placeholder for the failed stage and continue.
    /// A failed editor pass keeps the unedited draft.
    Placeholder,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Placeholder => "placeholder",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "placeholder" => Ok(FailurePolicy::Placeholder),
            other => Err(CoreError::Validation(format!(
                "Invalid stage failure policy '{other}'. Must be one of: abort, placeholder"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub failure_policy: FailurePolicy,
    /// Maximum body sections in flight; values below 1 are treated as 1.
    pub section_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            section_concurrency: DEFAULT_SECTION_CONCURRENCY,
        }
    }
}

/// Placeholder body used in place of a failed stage's output.
pub fn placeholder(err: &GenerationError) -> String {
    format!("[Error generating content: {}]", err.source)
}

// ---------------------------------------------------------------------------
// ArticlePipeline
// ---------------------------------------------------------------------------

/// Generates complete articles with a shared text generator.
#[derive(Clone)]
pub struct ArticlePipeline {
    generator: Arc<dyn TextGenerator>,
    options: PipelineOptions,
}

impl ArticlePipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, options: PipelineOptions) -> Self {
        Self { generator, options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Generate the article for `request`, returning the edited document.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        reporter: &dyn ProgressReporter,
    ) -> Result<String, PipelineError> {
        let budget = WordBudget::compute(
            &request.parameters.length,
            request.sections.len(),
            &mut rand::rng(),
        )?;

        reporter.publish(keys::STATUS, progress::STATUS_STARTING.into());
        reporter.publish(keys::ARTICLE_TITLE, request.title.clone().into());
        reporter.publish(keys::SECTIONS, request.sections.clone().into());
        reporter.publish(keys::LENGTH, budget.length.into());
        reporter.publish(keys::TOTAL_WORD_COUNT, budget.total.into());
        reporter.publish(keys::SECTION_WORD_COUNT, budget.per_section.into());
        tracing::info!(
            title = %request.title,
            sections = request.sections.len(),
            total_words = budget.total,
            per_section = budget.per_section,
            "Starting article generation",
        );

        let stages = StageGenerator::new(self.generator.as_ref(), request);
        let mut parts: Vec<String> = Vec::with_capacity(request.sections.len() + 4);

        // Introduction.
        reporter.publish(keys::PROGRESS, progress::BEFORE_INTRODUCTION.into());
        reporter.publish(keys::STATUS, progress::STATUS_INTRODUCTION.into());
        parts.push(self.recover(stages.introduction().await, &request.title)?);
        reporter.publish(keys::STATUS, progress::STATUS_INTRODUCTION_DONE.into());
        reporter.publish(keys::PROGRESS, progress::AFTER_INTRODUCTION.into());

        // Body sections, assembled in request order.
        parts.extend(self.sections(&stages, request, budget.per_section, reporter).await?);

        // Conclusion.
        reporter.publish(keys::PROGRESS, progress::AFTER_CONCLUSION.into());
        reporter.publish(keys::STATUS, progress::STATUS_CONCLUSION.into());
        parts.push(self.recover(stages.conclusion().await, &request.title)?);
        reporter.publish(keys::STATUS, progress::STATUS_CONCLUSION_DONE.into());
        reporter.publish(keys::PROGRESS, progress::AFTER_FAQ.into());

        if request.parameters.options.faq_sections {
            reporter.publish(keys::GENERATING, "FAQ section".into());
            reporter.publish(keys::STATUS, progress::STATUS_FAQ.into());
            parts.push(self.recover(stages.faq().await, &request.title)?);
            reporter.publish(keys::STATUS, progress::STATUS_FAQ_DONE.into());
        }
        reporter.publish(keys::PROGRESS, progress::AFTER_SUMMARY.into());

        if request.parameters.options.summary {
            reporter.publish(keys::GENERATING, "Summary".into());
            reporter.publish(keys::STATUS, progress::STATUS_SUMMARY.into());
            parts.push(self.recover(stages.summary().await, &request.title)?);
            reporter.publish(keys::STATUS, progress::STATUS_SUMMARY_DONE.into());
        }

        let draft = parts.join("\n\n");

        // Editor pass replaces the draft.
        reporter.publish(keys::PROGRESS, progress::BEFORE_EDIT.into());
        reporter.publish(keys::STATUS, progress::STATUS_EDITING.into());
        let article = match editor::edit(self.generator.as_ref(), request, &draft).await {
            Ok(edited) => edited,
            Err(err) if self.options.failure_policy == FailurePolicy::Placeholder => {
                tracing::warn!(error = %err, "Editor pass failed, keeping unedited draft");
                draft
            }
            Err(err) => return Err(err.into()),
        };
        reporter.publish(keys::PROGRESS, progress::DONE.into());
        reporter.publish(keys::STATUS, progress::STATUS_COMPLETED.into());

        Ok(article)
    }

    async fn sections(
        &self,
        stages: &StageGenerator<'_>,
        request: &GenerationRequest,
        words: u32,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<String>, PipelineError> {
        let count = request.sections.len();
        let concurrency = self.options.section_concurrency.max(1);

        futures::stream::iter(0..count)
            .map(|i| {
                let title = &request.sections[i];
                let index = i + 1;
                async move {
                    reporter.publish(keys::PROGRESS, progress::section_progress(index, count).into());
                    reporter.publish(keys::STATUS, progress::status_section(title).into());
                    let result = stages.section(index, title, words).await;
                    if result.is_ok() {
                        reporter.publish(keys::STATUS, progress::status_section_done(title).into());
                    }
                    self.recover(result, &request.title)
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }

    /// Apply the failure policy to one stage result.
    fn recover(
        &self,
        result: Result<String, GenerationError>,
        article_title: &str,
    ) -> Result<String, PipelineError> {
        match result {
            Ok(text) => Ok(text),
            Err(err) => match self.options.failure_policy {
                FailurePolicy::Abort => Err(err.into()),
                FailurePolicy::Placeholder => {
                    tracing::warn!(stage = %err.stage, error = %err.source, "Stage failed, using placeholder");
                    Ok(with_heading(&err.stage, article_title, &placeholder(&err)))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::Value;

    use super::*;
    use crate::error::Stage;
    use crate::testing::{request, FakeGenerator, RecordingReporter};

    fn pipeline(fake: FakeGenerator, options: PipelineOptions) -> (ArticlePipeline, Arc<FakeGenerator>) {
        let fake = Arc::new(fake);
        let generator: Arc<dyn TextGenerator> = fake.clone();
        (ArticlePipeline::new(generator, options), fake)
    }

    fn headings(doc: &str) -> Vec<&str> {
        doc.lines().filter(|l| l.starts_with('#')).collect()
    }

    const SECTIONS: [&str; 3] = ["Flexibility", "Cost Savings", "Challenges"];

    #[tokio::test]
    async fn plain_article_has_five_headings_in_order() {
        let (pipeline, _) = pipeline(FakeGenerator::new(), PipelineOptions::default());
        let reporter = RecordingReporter::default();

        let doc = pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert_eq!(
            headings(&doc),
            vec![
                "# Benefits of Remote Work",
                "## Flexibility",
                "## Cost Savings",
                "## Challenges",
                "## Conclusion",
            ]
        );
    }

    #[tokio::test]
    async fn faq_and_summary_follow_the_conclusion() {
        let (pipeline, _) = pipeline(FakeGenerator::new(), PipelineOptions::default());
        let reporter = RecordingReporter::default();
        let mut req = request(&SECTIONS);
        req.parameters.options.faq_sections = true;
        req.parameters.options.summary = true;

        let doc = pipeline.generate(&req, &reporter).await.unwrap();
        let found = headings(&doc);
        assert_eq!(found.len(), 7);
        assert_eq!(
            &found[4..],
            &["## Conclusion", "## Frequently Asked Questions", "## Summary"]
        );
        assert_eq!(
            reporter.values(keys::GENERATING),
            vec![Value::from("FAQ section"), Value::from("Summary")]
        );
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_one() {
        let (pipeline, _) = pipeline(FakeGenerator::new(), PipelineOptions::default());
        let reporter = RecordingReporter::default();
        let mut req = request(&SECTIONS);
        req.parameters.options.summary = true;

        pipeline.generate(&req, &reporter).await.unwrap();
        let values = reporter.progress();
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
        assert_eq!(values.first().copied(), Some(progress::BEFORE_INTRODUCTION));
        assert_eq!(values.last().copied(), Some(progress::DONE));
        assert_eq!(
            reporter.statuses().last().map(String::as_str),
            Some(progress::STATUS_COMPLETED)
        );
    }

    #[tokio::test]
    async fn budget_is_published_before_generation() {
        let (pipeline, _) = pipeline(FakeGenerator::new(), PipelineOptions::default());
        let reporter = RecordingReporter::default();

        pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert_eq!(reporter.values(keys::LENGTH), vec![Value::from("medium")]);
        let total = reporter.values(keys::TOTAL_WORD_COUNT)[0].as_u64().unwrap();
        assert!((800..=1200).contains(&total));
        let per_section = reporter.values(keys::SECTION_WORD_COUNT)[0].as_u64().unwrap();
        assert_eq!(per_section, (total - total / 5) / 3);
    }

    #[tokio::test]
    async fn editor_output_replaces_the_draft() {
        let (pipeline, fake) = pipeline(
            FakeGenerator::new().with_editor_reply("# Final article"),
            PipelineOptions::default(),
        );
        let reporter = RecordingReporter::default();

        let doc = pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert_eq!(doc, "# Final article");

        // intro + 3 sections + conclusion + editor
        assert_eq!(fake.calls().len(), 6);
    }

    #[tokio::test]
    async fn abort_stops_at_first_failed_stage() {
        let (pipeline, fake) = pipeline(
            FakeGenerator::new().failing_on("section \"Cost Savings\""),
            PipelineOptions::default(),
        );
        let reporter = RecordingReporter::default();

        let err = pipeline
            .generate(&request(&SECTIONS), &reporter)
            .await
            .unwrap_err();
        assert_matches!(
            err,
            PipelineError::Stage(GenerationError { stage: Stage::Section { index: 2, .. }, .. })
        );
        // intro, section 1, section 2; nothing after the failure.
        assert_eq!(fake.calls().len(), 3);
        assert!(!reporter.progress().contains(&progress::DONE));
    }

    #[tokio::test]
    async fn placeholder_policy_continues_past_failures() {
        let options = PipelineOptions {
            failure_policy: FailurePolicy::Placeholder,
            ..PipelineOptions::default()
        };
        let (pipeline, fake) = pipeline(FakeGenerator::new().failing_on("strong conclusion"), options);
        let reporter = RecordingReporter::default();

        let doc = pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert!(doc.contains(
            "## Conclusion\n\n[Error generating content: Model API error (500): boom]"
        ));
        assert_eq!(headings(&doc).len(), 5);
        assert_eq!(fake.calls().len(), 6);
        assert_eq!(reporter.progress().last().copied(), Some(progress::DONE));
    }

    #[tokio::test]
    async fn placeholder_policy_keeps_draft_when_editor_fails() {
        let options = PipelineOptions {
            failure_policy: FailurePolicy::Placeholder,
            ..PipelineOptions::default()
        };
        let (pipeline, _) = pipeline(FakeGenerator::new().failing_on("professional editor"), options);
        let reporter = RecordingReporter::default();

        let doc = pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert!(doc.starts_with("# Benefits of Remote Work\n\n"));
        assert_eq!(headings(&doc).len(), 5);
    }

    #[tokio::test]
    async fn concurrent_sections_keep_request_order() {
        let options = PipelineOptions {
            section_concurrency: 2,
            ..PipelineOptions::default()
        };
        let (pipeline, fake) = pipeline(
            FakeGenerator::new().with_delay(Duration::from_millis(20)),
            options,
        );
        let reporter = RecordingReporter::default();
        let sections = ["One", "Two", "Three", "Four", "Five"];

        let doc = pipeline.generate(&request(&sections), &reporter).await.unwrap();
        let found = headings(&doc);
        assert_eq!(
            &found[1..6],
            &["## One", "## Two", "## Three", "## Four", "## Five"]
        );
        assert_eq!(fake.max_in_flight(), 2);
        let values = reporter.progress();
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
    }

    #[tokio::test]
    async fn sequential_by_default() {
        let (pipeline, fake) = pipeline(
            FakeGenerator::new().with_delay(Duration::from_millis(5)),
            PipelineOptions::default(),
        );
        let reporter = RecordingReporter::default();
        pipeline.generate(&request(&SECTIONS), &reporter).await.unwrap();
        assert_eq!(fake.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn empty_section_list_is_rejected_before_any_call() {
        let (pipeline, fake) = pipeline(FakeGenerator::new(), PipelineOptions::default());
        let reporter = RecordingReporter::default();

        let err = pipeline.generate(&request(&[]), &reporter).await.unwrap_err();
        assert_matches!(err, PipelineError::InvalidRequest(CoreError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!(" Placeholder ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Placeholder);
        assert_matches!("retry".parse::<FailurePolicy>(), Err(CoreError::Validation(_)));
        assert_eq!(FailurePolicy::default().as_str(), "abort");
    }
}
