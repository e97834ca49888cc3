//! Instruction text sent to the model for each stage.
//!
//! Every writer prompt ends with [`WRITER_SUFFIX`] and is sent with
//! [`WRITER_SYSTEM`] as the system prompt. The editor uses its own system
//! prompt carrying the guidelines, with the draft as the user message.

use copypanda_core::budget::editor_target_words;
use copypanda_core::params::StyleParams;

use crate::request::GenerationRequest;

/// Closing sentence of every writer and editor prompt.
pub const LANGUAGE_DIRECTIVE: &str = "Language the same as the language given in text.";

pub const WRITER_SYSTEM: &str = "You are a professional content writer. Generate high-quality, \
engaging content following the instructions provided. Language the same as the language given in text.";

pub const WRITER_SUFFIX: &str = "Respond with plain text content only, without any additional \
formatting or metadata. Return the content in markdown format. Language the same as the language given in text.";

/// Approximate introduction length in words.
pub const INTRODUCTION_WORDS: u32 = 100;
/// Approximate conclusion length in words.
pub const CONCLUSION_WORDS: u32 = 150;
/// Approximate summary length in words.
pub const SUMMARY_WORDS: u32 = 150;
/// Number of questions in the FAQ section.
pub const FAQ_QUESTIONS: u32 = 5;

/// Append the plain-text directive to a stage prompt.
pub fn writer_prompt(prompt: &str) -> String {
    format!("{prompt}\n\n{WRITER_SUFFIX}")
}

fn style_directive(style: &StyleParams) -> String {
    format!(
        " The tone should be {} and the writing style should be {}.",
        style.content_tone, style.writing_style
    )
}

fn tone_directive(style: &StyleParams) -> String {
    format!(" The tone should be {}.", style.content_tone)
}

fn context_clause(prefix: &str, context: Option<&str>) -> String {
    context
        .map(|c| format!(" {prefix} {c}"))
        .unwrap_or_default()
}

pub fn introduction(req: &GenerationRequest) -> String {
    format!(
        "Write an engaging introduction for an article titled \"{}\"{}.{} The introduction should be approximately {INTRODUCTION_WORDS} words.",
        req.title,
        context_clause("with the following context:", req.context.as_deref()),
        style_directive(&req.parameters.style),
    )
}

/// Prompt for one body section with its share of the word budget.
pub fn section(req: &GenerationRequest, section_title: &str, words: u32) -> String {
    format!(
        "Write content for the section \"{section_title}\" of an article titled \"{}\"{}.{}{} This section should be approximately {words} words.",
        req.title,
        context_clause("taking into account this context:", req.context.as_deref()),
        style_directive(&req.parameters.style),
        req.parameters.format.instructions(),
    )
}

pub fn conclusion(req: &GenerationRequest) -> String {
    format!(
        "Write a strong conclusion for an article titled \"{}\"{}.{} The conclusion should be approximately {CONCLUSION_WORDS} words.",
        req.title,
        context_clause("with the following context:", req.context.as_deref()),
        style_directive(&req.parameters.style),
    )
}

pub fn faq(req: &GenerationRequest) -> String {
    format!(
        "Generate {FAQ_QUESTIONS} frequently asked questions and answers for an article titled \"{}\" covering these sections: {}{}.{} Format as a Q&A section with bold questions followed by detailed answers.",
        req.title,
        req.sections.join(", "),
        context_clause("with this additional context:", req.context.as_deref()),
        tone_directive(&req.parameters.style),
    )
}

pub fn summary(req: &GenerationRequest) -> String {
    format!(
        "Write a concise summary for an article titled \"{}\" that covers these sections: {}{}.{} The summary should be approximately {SUMMARY_WORDS} words.",
        req.title,
        req.sections.join(", "),
        context_clause("with this additional context:", req.context.as_deref()),
        tone_directive(&req.parameters.style),
    )
}

/// System prompt for the editor pass: the editing guidelines.
pub fn editor_system(req: &GenerationRequest) -> String {
    let context = context_clause("taking into account this context:", req.context.as_deref());
    let length = format!(
        " The article should be approximately {} words.",
        editor_target_words(&req.parameters.length)
    );
    format!(
        "You are acting as a professional editor. You'll be provided with an article and specific \
editing guidelines. Your task is to carefully edit the provided text according to all given \
instructions. Ensure the text remains clear, readable, natural-sounding, and closely resembles \
human-written content. Return the final text formatted neatly in high-quality Markdown, including \
appropriate headings, subheadings, bullet points, numbered lists, bold and italic formatting, and \
block quotes where suitable.\n\
Guidelines:\n\
Title: {}\n\
- Context:{context}\n\
- Style:{}\n\
- Format:{}\n\
- Length:{length}\n\
{LANGUAGE_DIRECTIVE}",
        req.title,
        style_directive(&req.parameters.style),
        req.parameters.format.instructions(),
    )
}

/// Prefix of the editor's user message; the draft follows it.
pub const EDITOR_DRAFT_PREFIX: &str =
    "You are given a draft of a content. Please edit it to make it better.\nDraft: ";

pub fn editor_user(draft: &str) -> String {
    format!("{EDITOR_DRAFT_PREFIX}{draft}")
}

/// Prompt asking for `count` section titles as a JSON array of strings.
pub fn suggest_sections(title: &str, context: Option<&str>, count: u32) -> String {
    let context_line = context.map(|c| format!("Context: {c}\n")).unwrap_or_default();
    format!(
        "You are an expert at generating attractive and engaging sections for blog articles.\n\n\
I will provide you with an article title and the desired number of sections ({count}). Your task is \
to create creative, logical, and cohesive section suggestions that can later be easily expanded into \
a full article.\n\n\
IMPORTANT! Sections must be concise, ideally one short sentence, clear, and user-friendly.\n\n\
Please follow these guidelines when generating sections:\n\n\
1. Sections should be engaging, interesting, and encourage continued reading.\n\
2. Each section should logically flow from the previous one, creating a cohesive structure for the article.\n\
3. Incorporate variety, using different approaches to the topic such as examples, statistical data, \
practical tips, common mistakes, myths and facts, or case studies.\n\
4. Avoid general or vague section titles. Use specific language and keywords that clearly reflect the content.\n\
5. Sections should be brief, concise, and easy to understand.\n\
6. Generate sections in the language used in the article's title.\n\n\
Article Title: {title}\n\
{context_line}\
Number of sections: {count}\n\
Return only a JSON array of strings containing the section titles, without additional information."
    )
}
