use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::export::to_csv_bytes;
use crate::filter::{
    distinct_sentiments, filter_by_keyword, filter_by_sentiment, group_by_customer,
    sentiment_distribution,
};
use crate::keywords::top_keywords;
use crate::model::{GroupedRecord, InsightRecord, KeywordCount, SentimentCount};

/// What the user picked in the dashboard controls.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilters {
    pub keyword: String,
    /// `None` selects every sentiment present after the keyword filter.
    pub sentiments: Option<BTreeSet<String>>,
    pub group_by_customer: bool,
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Flat(Vec<InsightRecord>),
    Grouped(Vec<GroupedRecord>),
}

impl DashboardView {
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(rows) => rows.len(),
            Self::Grouped(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// CSV download of exactly what is on screen.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Flat(rows) => to_csv_bytes(rows),
            Self::Grouped(rows) => to_csv_bytes(rows),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub view: DashboardView,
    /// Sentiments offered by the multiselect (after the keyword filter).
    pub available_sentiments: Vec<String>,
    /// Distribution over the filtered, ungrouped rows.
    pub distribution: Vec<SentimentCount>,
    /// Most frequent words in the filtered customer messages.
    pub keywords: Vec<KeywordCount>,
}

/// Keyword filter, then sentiment filter, then optional grouping.
pub fn build_dashboard(records: &[InsightRecord], filters: &DashboardFilters) -> Dashboard {
    let rows = filter_by_keyword(records, filters.keyword.trim());
    let available_sentiments = distinct_sentiments(&rows);
    let rows = match &filters.sentiments {
        Some(allowed) => filter_by_sentiment(&rows, allowed),
        None => rows,
    };

    let distribution = sentiment_distribution(&rows);
    let texts: Vec<&str> = rows.iter().map(|r| r.message.as_str()).collect();
    let keywords = top_keywords(&texts, filters.top_k);

    let view = if filters.group_by_customer {
        DashboardView::Grouped(group_by_customer(&rows))
    } else {
        DashboardView::Flat(rows)
    };

    Dashboard {
        view,
        available_sentiments,
        distribution,
        keywords,
    }
}

// ================================
// HTML dashboard (simple, self-contained)
// ================================

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the table, the sentiment bars and the keyword list as one HTML page.
pub fn render_html(dashboard: &Dashboard, filters: &DashboardFilters) -> String {
    let mut html = String::new();
    html.push_str(r#"<!doctype html>
<html>
<head>
<meta charset="utf-8" />
<title>Chat Insight Dashboard</title>
<style>
body { font-family: system-ui, -apple-system, Segoe UI, Roboto, sans-serif; margin: 20px; }
table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }
th, td { padding: 6px 8px; border-bottom: 1px solid #ddd; vertical-align: top; text-align: left; }
td.text { white-space: pre-wrap; }
tr:hover { background: #f6f6f6; }
.bar { background: #4f7df3; height: 14px; border-radius: 2px; }
.small { color: #666; font-size: 12px; }
</style>
</head>
<body>
<h1>Chat Insight Dashboard</h1>
"#);

    let selected = match &filters.sentiments {
        Some(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
        None => "all".to_string(),
    };
    html.push_str(&format!(
        r#"<p class="small">Keyword: “{}” · Sentiments: {} · Grouped: {} · Rows: {}</p>
"#,
        html_escape(&filters.keyword),
        html_escape(&selected),
        if filters.group_by_customer { "yes" } else { "no" },
        dashboard.view.len()
    ));

    html.push_str("<h2>Chat Insights</h2>\n<table>\n");
    html.push_str("<thead><tr><th>Customer</th><th>Message</th><th>AI Insight</th><th>Sentiment</th></tr></thead>\n<tbody>\n");
    let cells: Vec<[&str; 4]> = match &dashboard.view {
        DashboardView::Flat(rows) => rows
            .iter()
            .map(|r| [r.customer.as_str(), r.message.as_str(), r.insight.as_str(), r.sentiment.as_str()])
            .collect(),
        DashboardView::Grouped(rows) => rows
            .iter()
            .map(|r| [r.customer.as_str(), r.messages.as_str(), r.insights.as_str(), r.sentiments.as_str()])
            .collect(),
    };
    for [customer, message, insight, sentiment] in cells {
        html.push_str(&format!(
            r#"<tr><td>{}</td><td class="text">{}</td><td class="text">{}</td><td>{}</td></tr>
"#,
            html_escape(customer),
            html_escape(message),
            html_escape(insight),
            html_escape(sentiment)
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str("<h2>Sentiment Distribution</h2>\n<table>\n<tbody>\n");
    let max = dashboard.distribution.iter().map(|c| c.count).max().unwrap_or(1).max(1);
    for c in &dashboard.distribution {
        let width = c.count * 100 / max;
        html.push_str(&format!(
            r#"<tr><td>{}</td><td style="width:70%"><div class="bar" style="width:{}%"></div></td><td>{}</td></tr>
"#,
            html_escape(&c.sentiment),
            width,
            c.count
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    if !dashboard.keywords.is_empty() {
        html.push_str("<h2>Top Keywords</h2>\n<ul>\n");
        for k in &dashboard.keywords {
            html.push_str(&format!("<li>{} ({})</li>\n", html_escape(&k.keyword), k.count));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn write_html<P: AsRef<Path>>(
    dashboard: &Dashboard,
    filters: &DashboardFilters,
    path: P,
) -> Result<()> {
    info!("🖼️ Writing HTML dashboard: {}", path.as_ref().display());
    let mut f = File::create(path)?;
    f.write_all(render_html(dashboard, filters).as_bytes())?;
    Ok(())
}

/// Plain-text summary for the terminal.
pub fn render_summary(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("Rows: {}\n", dashboard.view.len()));
    out.push_str("Sentiment distribution:\n");
    let max = dashboard.distribution.iter().map(|c| c.count).max().unwrap_or(1).max(1);
    for c in &dashboard.distribution {
        let bar = "█".repeat((c.count * 30).div_ceil(max));
        out.push_str(&format!("  {:<12} {:>4} {}\n", c.sentiment, c.count, bar));
    }
    if !dashboard.keywords.is_empty() {
        let list: Vec<String> = dashboard
            .keywords
            .iter()
            .map(|k| format!("{} ({})", k.keyword, k.count))
            .collect();
        out.push_str(&format!("Top keywords: {}\n", list.join(", ")));
    }
    out
}
