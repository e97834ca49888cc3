//! Progress fractions and status labels published while an article is
//! generated.
//!
//! The schedule is fixed: every value below is reached in order during a
//! successful run, so reported progress never decreases.

/// Published before the introduction is requested.
pub const BEFORE_INTRODUCTION: f64 = 0.1;
/// Published once the introduction is done.
pub const AFTER_INTRODUCTION: f64 = 0.2;
/// Share of the schedule spread across the body sections.
pub const SECTIONS_SPAN: f64 = 0.5;
/// Published once the conclusion is done.
pub const AFTER_CONCLUSION: f64 = 0.7;
/// Published after the (optional) FAQ step.
pub const AFTER_FAQ: f64 = 0.8;
/// Published after the (optional) summary step.
pub const AFTER_SUMMARY: f64 = 0.9;
/// Published before the editor pass.
pub const BEFORE_EDIT: f64 = 0.95;
/// Published once the editor pass is done.
pub const DONE: f64 = 1.0;

/// Progress reached when body section `index` (1-based) of `count` starts.
///
/// Interpolates linearly from [`AFTER_INTRODUCTION`] to [`AFTER_CONCLUSION`].
pub fn section_progress(index: usize, count: usize) -> f64 {
    if count == 0 {
        return AFTER_INTRODUCTION;
    }
    let index = index.min(count);
    AFTER_INTRODUCTION + SECTIONS_SPAN * (index as f64 / count as f64)
}

// ---------------------------------------------------------------------------
// Status labels
// ---------------------------------------------------------------------------

pub const STATUS_STARTING: &str = "Starting content generation agent";
pub const STATUS_INTRODUCTION: &str = "Generating introduction";
pub const STATUS_INTRODUCTION_DONE: &str = "Introduction generated";
pub const STATUS_CONCLUSION: &str = "Generating conclusion";
pub const STATUS_CONCLUSION_DONE: &str = "Conclusion generated";
pub const STATUS_FAQ: &str = "Generating FAQ section";
pub const STATUS_FAQ_DONE: &str = "FAQ section generated";
pub const STATUS_SUMMARY: &str = "Generating summary";
pub const STATUS_SUMMARY_DONE: &str = "Summary generated";
pub const STATUS_EDITING: &str = "Editing article";
pub const STATUS_COMPLETED: &str = "Article generation completed";
pub const STATUS_FAILED: &str = "Article generation failed";

/// Label published when a body section starts.
pub fn status_section(title: &str) -> String {
    format!("Generating section: {title}")
}

/// Label published when a body section finishes.
pub fn status_section_done(title: &str) -> String {
    format!("Section generated: {title}")
}

// ---------------------------------------------------------------------------
// Metadata keys
// ---------------------------------------------------------------------------

/// Keys of the fields published on a run's status channel.
pub mod keys {
    pub const STATUS: &str = "status";
    pub const PROGRESS: &str = "progress";
    pub const ARTICLE_TITLE: &str = "article_title";
    pub const SECTIONS: &str = "sections";
    pub const LENGTH: &str = "length";
    pub const TOTAL_WORD_COUNT: &str = "total_word_count";
    pub const SECTION_WORD_COUNT: &str = "section_word_count";
    pub const GENERATING: &str = "generating";
}
