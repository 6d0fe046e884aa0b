//! Filters and aggregations over the insight table.
//!
//! Every filter is a pure predicate over single rows, so filters commute and
//! applying one twice changes nothing.

use std::collections::{BTreeSet, HashMap};

use crate::model::{GroupedRecord, InsightRecord, SentimentCount};

pub const TEXT_SEPARATOR: &str = " | ";
pub const SENTIMENT_SEPARATOR: &str = ", ";

/// Case-insensitive substring match on the message or the insight.
/// An empty keyword keeps every row.
pub fn filter_by_keyword(records: &[InsightRecord], keyword: &str) -> Vec<InsightRecord> {
    if keyword.is_empty() {
        return records.to_vec();
    }
    let needle = keyword.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.message.to_lowercase().contains(&needle) || r.insight.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn filter_by_sentiment(
    records: &[InsightRecord],
    allowed: &BTreeSet<String>,
) -> Vec<InsightRecord> {
    records
        .iter()
        .filter(|r| allowed.contains(&r.sentiment))
        .cloned()
        .collect()
}

/// One row per customer, in first-seen order; fields joined in row order.
pub fn group_by_customer(records: &[InsightRecord]) -> Vec<GroupedRecord> {
    struct Group<'a> {
        customer: &'a str,
        messages: Vec<&'a str>,
        insights: Vec<&'a str>,
        sentiments: Vec<&'a str>,
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in records {
        let i = *index.entry(r.customer.as_str()).or_insert_with(|| {
            groups.push(Group {
                customer: &r.customer,
                messages: Vec::new(),
                insights: Vec::new(),
                sentiments: Vec::new(),
            });
            groups.len() - 1
        });
        let g = &mut groups[i];
        g.messages.push(&r.message);
        g.insights.push(&r.insight);
        g.sentiments.push(&r.sentiment);
    }

    groups
        .into_iter()
        .map(|g| GroupedRecord {
            customer: g.customer.to_string(),
            messages: g.messages.join(TEXT_SEPARATOR),
            insights: g.insights.join(TEXT_SEPARATOR),
            sentiments: g.sentiments.join(SENTIMENT_SEPARATOR),
        })
        .collect()
}

/// Sentiment values in the order they first appear.
pub fn distinct_sentiments(records: &[InsightRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for r in records {
        if !seen.contains(&r.sentiment) {
            seen.push(r.sentiment.clone());
        }
    }
    seen
}

/// Row count per sentiment, largest first; ties keep first-seen order.
pub fn sentiment_distribution(records: &[InsightRecord]) -> Vec<SentimentCount> {
    let mut counts: Vec<SentimentCount> = distinct_sentiments(records)
        .into_iter()
        .map(|sentiment| SentimentCount { sentiment, count: 0 })
        .collect();
    for r in records {
        if let Some(c) = counts.iter_mut().find(|c| c.sentiment == r.sentiment) {
            c.count += 1;
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
