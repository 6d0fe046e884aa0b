//! chat-insights CLI
//! -----------------
//!   generate:   chats.csv -> prompt -> LLM -> insights.csv (+ JSONL)
//!   dashboard:  insights.csv -> keyword / sentiment / group filters -> HTML + CSV
//!   transcribe: audio -> transcript -> one insight row
//!
//! Console logging goes through tracing; set RUST_LOG=debug for per-request detail.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chat_insights::config::{ApiConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECONDS};
use chat_insights::dashboard::{build_dashboard, render_summary, write_html, DashboardFilters};
use chat_insights::export::{write_csv, write_jsonl};
use chat_insights::generate::{generate_insight, OpenRouterClient};
use chat_insights::keywords::DEFAULT_TOP_K;
use chat_insights::model::{ChatRecord, InsightRecord};
use chat_insights::pipeline::{run_pipeline, PipelineOptions};
use chat_insights::prompt::{build_prompt, load_template, DEFAULT_LANGUAGE};
use chat_insights::session::Session;
use chat_insights::table::{has_insight_column, read_chats, read_chats_file, read_insights_file};
use chat_insights::transcribe::{transcribe_or_sentinel, WhisperClient};

const SAMPLE_CHATS: &str = include_str!("../data/sample_chats.csv");

// ================================
// CLI
// ================================

#[derive(Debug, Parser)]
#[command(name = "chat-insights", version, about = "AI-powered customer chat insights: sentiment, filters, CSV export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an AI insight for every chat message
    Generate {
        /// Input CSV with Customer and Message columns
        #[arg(long, value_name = "FILE", required_unless_present = "demo")]
        input: Option<PathBuf>,

        /// Run on the built-in sample chats
        #[arg(long, default_value_t = false, conflicts_with = "input")]
        demo: bool,

        /// Output CSV (Customer, Message, AI Insight, Sentiment)
        #[arg(long, value_name = "FILE", default_value = "data/chat_insights_output.csv")]
        output: PathBuf,

        /// Also write the rows as JSON lines
        #[arg(long, value_name = "FILE")]
        jsonl: Option<PathBuf>,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Filter, group and export an insight table
    Dashboard {
        /// Insight CSV; a table without "AI Insight" is generated first
        #[arg(long, value_name = "FILE", default_value = "data/chat_insights_output.csv")]
        input: PathBuf,

        /// Keep rows whose message or insight contains this (case-insensitive)
        #[arg(long, default_value = "")]
        keyword: String,

        /// Sentiments to keep (repeatable); all when omitted
        #[arg(long = "sentiment", value_name = "LABEL")]
        sentiments: Vec<String>,

        /// One row per customer
        #[arg(long, default_value_t = false)]
        group_by_customer: bool,

        /// Number of keywords to list
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_keywords: usize,

        /// Self-contained HTML dashboard
        #[arg(long, value_name = "FILE", default_value = "out/dashboard.html")]
        html: PathBuf,

        /// CSV of the filtered (or grouped) view
        #[arg(long, value_name = "FILE", default_value = "out/filtered_chat_insights.csv")]
        csv: PathBuf,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Transcribe a voice message and generate its insight
    Transcribe {
        /// Audio file (wav, mp3, m4a, ...)
        #[arg(long, value_name = "FILE")]
        audio: PathBuf,

        /// Customer the voice message belongs to
        #[arg(long, default_value = "Voice customer")]
        customer: String,

        #[command(flatten)]
        generation: GenerationArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct GenerationArgs {
    /// Model ID on OpenRouter
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Language the model should answer in
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Custom prompt template (defaults to the built-in summarizer prompt)
    #[arg(long, value_name = "FILE")]
    prompt_file: Option<PathBuf>,

    /// Parallel model requests (1 = one row after another)
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Overall HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout_seconds: u64,
}

impl GenerationArgs {
    fn pipeline_options(&self) -> Result<PipelineOptions> {
        Ok(PipelineOptions {
            template: load_template(self.prompt_file.as_deref())?,
            language: self.language.clone(),
            model: self.model.clone(),
            concurrency: self.concurrency.max(1),
            show_progress: true,
        })
    }

    /// Credential is resolved here, before any row is touched.
    fn api_config(&self) -> Result<ApiConfig> {
        Ok(ApiConfig::from_env(self.timeout_seconds)?)
    }
}

// ================================
// Main
// ================================

fn main() -> Result<()> {
    // ---- Logging setup ----
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    dotenvy::dotenv().ok(); // loads variables from .env if present

    match Cli::parse().command {
        Command::Generate {
            input,
            demo,
            output,
            jsonl,
            generation,
        } => cmd_generate(input.as_deref(), demo, &output, jsonl.as_deref(), &generation),
        Command::Dashboard {
            input,
            keyword,
            sentiments,
            group_by_customer,
            top_keywords,
            html,
            csv,
            generation,
        } => {
            let filters = DashboardFilters {
                keyword,
                sentiments: (!sentiments.is_empty())
                    .then(|| sentiments.into_iter().collect::<BTreeSet<_>>()),
                group_by_customer,
                top_k: top_keywords,
            };
            cmd_dashboard(&input, &filters, &html, &csv, &generation)
        }
        Command::Transcribe {
            audio,
            customer,
            generation,
        } => cmd_transcribe(&audio, customer, &generation),
    }
}

fn cmd_generate(
    input: Option<&Path>,
    demo: bool,
    output: &Path,
    jsonl: Option<&Path>,
    generation: &GenerationArgs,
) -> Result<()> {
    let api = generation.api_config()?;

    let chats = if demo {
        info!("📄 Using built-in sample chats (embedded)");
        read_chats(SAMPLE_CHATS.as_bytes())?
    } else {
        let path = input.context("--input is required unless --demo is set")?;
        read_chats_file(path)?
    };
    if chats.is_empty() {
        warn!("No chat rows found. Nothing to do.");
        return Ok(());
    }

    let opts = generation.pipeline_options()?;
    let client = OpenRouterClient::new(api)?;
    let records = run_pipeline(&chats, &client, &opts)?;

    ensure_parent(output)?;
    write_csv(&records, output)?;
    if let Some(path) = jsonl {
        ensure_parent(path)?;
        write_jsonl(&records, path)?;
    }

    info!("✅ AI insights generated and saved to {}", output.display());
    Ok(())
}

fn cmd_dashboard(
    input: &Path,
    filters: &DashboardFilters,
    html: &Path,
    csv: &Path,
    generation: &GenerationArgs,
) -> Result<()> {
    let mut session = Session::new();

    let header = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let records: &[InsightRecord] = if has_insight_column(header)? {
        session.store(&generation.model, read_insights_file(input)?);
        session.cached().unwrap_or_default()
    } else {
        info!("No \"AI Insight\" column in {}, generating insights first", input.display());
        let api = generation.api_config()?;
        let chats = read_chats_file(input)?;
        let opts = generation.pipeline_options()?;
        let client = OpenRouterClient::new(api)?;
        session.insights(&generation.model, || run_pipeline(&chats, &client, &opts))?
    };

    let dashboard = build_dashboard(records, filters);
    print!("{}", render_summary(&dashboard));

    ensure_parent(html)?;
    write_html(&dashboard, filters, html)?;
    ensure_parent(csv)?;
    std::fs::write(csv, dashboard.view.to_csv_bytes()?)
        .with_context(|| format!("Failed to write {}", csv.display()))?;

    info!("📦 Outputs:");
    info!("  • HTML: {}", html.display());
    info!("  • CSV:  {}", csv.display());
    Ok(())
}

fn cmd_transcribe(audio: &Path, customer: String, generation: &GenerationArgs) -> Result<()> {
    let api = generation.api_config()?;
    let bytes = std::fs::read(audio)
        .with_context(|| format!("Failed to read audio file {}", audio.display()))?;
    let file_name = audio
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.wav".to_string());

    let whisper = WhisperClient::new(api.clone(), file_name)?;
    let transcript = transcribe_or_sentinel(&whisper, &bytes);
    info!("🎙️ Transcript: {transcript}");

    let opts = generation.pipeline_options()?;
    let client = OpenRouterClient::new(api)?;
    let prompt = build_prompt(&opts.template, &transcript, &opts.language);
    let insight = generate_insight(&client, &prompt, &opts.model);
    let record = InsightRecord::from_chat(ChatRecord::new(customer, transcript), insight);

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}
