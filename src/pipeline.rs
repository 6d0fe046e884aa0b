use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

use crate::generate::{generate_insight, Generator};
use crate::model::{ChatRecord, InsightRecord};
use crate::prompt::build_prompt;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub template: String,
    pub language: String,
    pub model: String,
    /// Worker threads; 1 processes rows strictly one after another.
    pub concurrency: usize,
    pub show_progress: bool,
}

/// Turn every chat into an insight row.
///
/// The output has exactly one row per input chat, in input order. Each row only
/// sees its own message; failed generations become `"Error: ..."` rows.
pub fn run_pipeline(
    chats: &[ChatRecord],
    generator: &dyn Generator,
    opts: &PipelineOptions,
) -> Result<Vec<InsightRecord>> {
    let started = Instant::now();
    info!(
        "🧠 Generating insights for {} messages (model={}, concurrency={})",
        chats.len(),
        opts.model,
        opts.concurrency
    );

    let pb = if opts.show_progress {
        let pb = ProgressBar::new(chats.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .context("invalid progress template")?
            .progress_chars("=>-"),
        );
        pb.set_message("analyzing…");
        pb
    } else {
        ProgressBar::hidden()
    };

    let process = |chat: &ChatRecord| {
        let prompt = build_prompt(&opts.template, &chat.message, &opts.language);
        let insight = generate_insight(generator, &prompt, &opts.model);
        pb.inc(1);
        InsightRecord::from_chat(chat.clone(), insight)
    };

    let records: Vec<InsightRecord> = if opts.concurrency <= 1 {
        chats.iter().map(process).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.concurrency)
            .build()
            .context("Failed to build Rayon thread pool")?;
        pool.install(|| chats.par_iter().map(process).collect())
    };

    pb.finish_with_message("done");
    let failed = records.iter().filter(|r| r.insight.starts_with("Error:")).count();
    info!(
        "🧮 Generated {} insights ({} failed) in {}ms",
        records.len(),
        failed,
        started.elapsed().as_millis()
    );
    Ok(records)
}
