use serde::{Deserialize, Serialize};

use crate::extract::extract_sentiment;

pub const CUSTOMER_COLUMN: &str = "Customer";
pub const MESSAGE_COLUMN: &str = "Message";
pub const INSIGHT_COLUMN: &str = "AI Insight";
pub const SENTIMENT_COLUMN: &str = "Sentiment";

/// One customer chat message, as loaded from the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl ChatRecord {
    pub fn new(customer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            message: message.into(),
        }
    }
}

/// A chat message plus the raw model output and the sentiment parsed from it.
///
/// `insight` may hold an `"Error: ..."` description when generation failed; the
/// row still exists so the table always has one row per input message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRecord {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "AI Insight")]
    pub insight: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
}

impl InsightRecord {
    /// Attach model output to a chat, deriving the sentiment label from it.
    pub fn from_chat(chat: ChatRecord, insight: String) -> Self {
        let sentiment = extract_sentiment(Some(&insight));
        Self {
            customer: chat.customer,
            message: chat.message,
            insight,
            sentiment,
        }
    }
}

/// All insight rows of one customer folded into a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRecord {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Message")]
    pub messages: String,
    #[serde(rename = "AI Insight")]
    pub insights: String,
    #[serde(rename = "Sentiment")]
    pub sentiments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCount {
    pub sentiment: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_chat_derives_sentiment() {
        let chat = ChatRecord::new("Ana", "My order is late");
        let rec = InsightRecord::from_chat(chat, "Summary: late order\nSentiment: negative".into());
        assert_eq!(rec.customer, "Ana");
        assert_eq!(rec.sentiment, "Negative");
    }

    #[test]
    fn error_insight_has_unknown_sentiment() {
        let chat = ChatRecord::new("Ben", "hello");
        let rec = InsightRecord::from_chat(chat, "Error: connection refused".into());
        assert_eq!(rec.sentiment, "Unknown");
        assert!(rec.insight.starts_with("Error:"));
    }
}
