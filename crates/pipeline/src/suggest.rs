//! Section title suggestions for the submission form.

use copypanda_llm::{CompletionRequest, LlmError, TextGenerator};

use crate::prompts;

/// Longest suggestion kept, matching the section title limit.
const MAX_TITLE_CHARS: usize = 190;

/// Ask the model for up to `count` section titles.
pub async fn suggest_sections(
    generator: &dyn TextGenerator,
    title: &str,
    context: Option<&str>,
    count: u32,
) -> Result<Vec<String>, LlmError> {
    let request = CompletionRequest::prompt(prompts::suggest_sections(title, context, count));
    let reply = generator.generate(&request).await?;

    let sections = parse_suggestions(&reply, count as usize);
    if sections.is_empty() {
        return Err(LlmError::Decode(
            "No section titles found in model reply".to_string(),
        ));
    }
    tracing::debug!(count = sections.len(), "Suggested sections");
    Ok(sections)
}

/// Extract titles from a reply.
///
/// Accepts a JSON array of strings (optionally fenced or wrapped in a
/// `{"sections": [...]}` object); otherwise takes one title per line with
/// list markers stripped.
pub fn parse_suggestions(reply: &str, count: usize) -> Vec<String> {
    let titles = parse_json(reply).unwrap_or_else(|| parse_lines(reply));
    titles
        .into_iter()
        .map(|t| clean(&t))
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(MAX_TITLE_CHARS).collect())
        .take(count)
        .collect()
}

fn parse_json(reply: &str) -> Option<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct Wrapped {
        sections: Vec<String>,
    }

    let start = reply.find(['[', '{'])?;
    let end = reply.rfind([']', '}'])?;
    let candidate = reply.get(start..=end)?;

    serde_json::from_str::<Vec<String>>(candidate)
        .ok()
        .or_else(|| {
            serde_json::from_str::<Wrapped>(candidate)
                .ok()
                .map(|w| w.sections)
        })
}

fn parse_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.starts_with("```"))
        .map(str::to_string)
        .collect()
}

/// Strip list markers, numbering and surrounding quotes.
fn clean(line: &str) -> String {
    let mut s = line.trim();
    s = s.trim_start_matches(['-', '*', '•']).trim_start();
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            s = stripped.trim_start();
        }
    }
    s.trim_matches(|c| c == '"' || c == '\'' || c == ',')
        .trim()
        .to_string()
}
