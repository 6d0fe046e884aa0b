use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::{InsightError, Result};
use crate::extract::extract_sentiment;
use crate::model::{ChatRecord, InsightRecord, CUSTOMER_COLUMN, INSIGHT_COLUMN, MESSAGE_COLUMN};

/// A previously generated row; any `Sentiment` column is ignored and re-derived.
#[derive(Debug, Deserialize)]
struct StoredInsight {
    #[serde(rename = "Customer")]
    customer: String,
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "AI Insight")]
    insight: Option<String>,
}

/// Load chat rows; the table must have `Customer` and `Message` columns.
pub fn read_chats<R: Read>(reader: R) -> Result<Vec<ChatRecord>> {
    let mut rdr = csv_reader(reader);
    require_columns(rdr.headers()?, &[CUSTOMER_COLUMN, MESSAGE_COLUMN])?;

    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        let chat: ChatRecord = row?;
        rows.push(chat);
    }
    Ok(rows)
}

/// Load an already generated insight table (the dashboard read path).
///
/// The insight text is taken as-is; the sentiment is always derived from it.
pub fn read_insights<R: Read>(reader: R) -> Result<Vec<InsightRecord>> {
    let mut rdr = csv_reader(reader);
    require_columns(
        rdr.headers()?,
        &[CUSTOMER_COLUMN, MESSAGE_COLUMN, INSIGHT_COLUMN],
    )?;

    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        let stored: StoredInsight = row?;
        let sentiment = extract_sentiment(stored.insight.as_deref());
        rows.push(InsightRecord {
            customer: stored.customer,
            message: stored.message,
            insight: stored.insight.unwrap_or_default(),
            sentiment,
        });
    }
    Ok(rows)
}

/// True when the CSV header row already carries generated insights.
pub fn has_insight_column<R: Read>(reader: R) -> Result<bool> {
    let mut rdr = csv_reader(reader);
    Ok(rdr.headers()?.iter().any(|h| h == INSIGHT_COLUMN))
}

pub fn read_chats_file(path: &Path) -> Result<Vec<ChatRecord>> {
    info!("📄 Reading chats: {}", path.display());
    read_chats(std::fs::File::open(path)?)
}

pub fn read_insights_file(path: &Path) -> Result<Vec<InsightRecord>> {
    info!("📄 Reading insights: {}", path.display());
    read_insights(std::fs::File::open(path)?)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn require_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(InsightError::SchemaViolation {
        required: required.iter().map(|c| c.to_string()).collect(),
        missing,
    })
}
