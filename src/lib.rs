//! chat-insights
//! -------------
//! Customer chat messages -> prompt -> hosted LLM -> sentiment -> filter/group -> CSV + HTML dashboard.
//!
//! Every per-row failure degrades to a sentinel value ("Error: ...", "Unknown"),
//! so the aggregation code never has to handle errors. The only blocking errors
//! are a missing credential and an input table without the required columns.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod generate;
pub mod keywords;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod table;
pub mod transcribe;

pub use error::{InsightError, Result};
pub use model::{ChatRecord, GroupedRecord, InsightRecord, KeywordCount, SentimentCount};
