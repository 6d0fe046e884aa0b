use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Built-in summarizer instructions (Summary / Sentiment / Suggested Action).
pub const DEFAULT_TEMPLATE: &str = include_str!("../prompts/summarizer_prompt.txt");

pub const DEFAULT_LANGUAGE: &str = "English";

const MESSAGE_SEPARATOR: &str = "\n\nCustomer Message:\n";

/// Combine the instruction template with one customer message.
///
/// A non-English `language` adds a trailing instruction naming the response language.
pub fn build_prompt(template: &str, message: &str, language: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + message.len() + 64);
    prompt.push_str(template);
    prompt.push_str(MESSAGE_SEPARATOR);
    prompt.push_str(message);

    let language = language.trim();
    if !language.is_empty() && !language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
        prompt.push_str("\n\nRespond in ");
        prompt.push_str(language);
        prompt.push('.');
    }
    prompt
}

/// Read the template once at start; fall back to the built-in one.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(DEFAULT_TEMPLATE.to_string());
    };
    info!("📝 Loading prompt template: {}", path.display());
    let mut buf = String::new();
    File::open(path)
        .context("Failed to open prompt file")?
        .read_to_string(&mut buf)
        .context("Failed to read prompt file as UTF-8")?;
    Ok(buf)
}
