//! Pull a labelled field (e.g. `Sentiment: Positive`) out of free-text model output.
//!
//! Line-oriented: the first line starting with `label:` (case-insensitive, leading
//! whitespace ignored) wins. The value is the rest of that line after the first
//! colon, trimmed and capitalized. Anything else resolves to [`UNKNOWN`].

/// Sentinel for absent or unparsable fields.
pub const UNKNOWN: &str = "Unknown";

pub const SENTIMENT_LABEL: &str = "Sentiment";

pub fn extract_field(text: &str, label: &str) -> String {
    let prefix = format!("{}:", label.to_lowercase());

    for line in text.lines() {
        let line = line.trim_start();
        // Compare on chars so a multi-byte label never splits a boundary.
        let head: String = line.chars().take(prefix.chars().count()).collect();
        if head.to_lowercase() != prefix {
            continue;
        }
        let value = line[head.len()..].trim();
        if value.is_empty() {
            return UNKNOWN.to_string();
        }
        return capitalize(value);
    }

    UNKNOWN.to_string()
}

/// Sentiment of one insight; `None` (an empty cell) is `Unknown`.
pub fn extract_sentiment(insight: Option<&str>) -> String {
    match insight {
        Some(text) => extract_field(text, SENTIMENT_LABEL),
        None => UNKNOWN.to_string(),
    }
}

/// First character upper-case, the rest lower-case.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
