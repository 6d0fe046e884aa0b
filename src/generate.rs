use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;

/// Anything that can turn a prompt into model text.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str, model_id: &str) -> Result<String>;
}

impl<F> Generator for F
where
    F: Fn(&str, &str) -> Result<String> + Send + Sync,
{
    fn generate(&self, prompt: &str, model_id: &str) -> Result<String> {
        self(prompt, model_id)
    }
}

/// Result of a single generation attempt, before it is stored in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed(String),
}

impl GenerationOutcome {
    pub fn attempt(generator: &dyn Generator, prompt: &str, model_id: &str) -> Self {
        match generator.generate(prompt, model_id) {
            Ok(text) => Self::Generated(text),
            // `{:#}` keeps the whole anyhow context chain on one line.
            Err(e) => Self::Failed(format!("{e:#}")),
        }
    }

    /// Collapse into row content; failures become `"Error: <cause>"`.
    pub fn into_content(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Failed(cause) => format!("Error: {cause}"),
        }
    }
}

/// One attempt, no retries. Never fails: errors come back as `"Error: ..."` text.
pub fn generate_insight(generator: &dyn Generator, prompt: &str, model_id: &str) -> String {
    let outcome = GenerationOutcome::attempt(generator, prompt, model_id);
    if let GenerationOutcome::Failed(cause) = &outcome {
        warn!("⚠️ [Model] Generation failed, storing error as insight: {cause}");
    }
    outcome.into_content()
}

// ================================
// OpenAI-compatible chat completions (OpenRouter)
// ================================

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenRouterClient {
    client: Client,
    config: ApiConfig,
}

impl OpenRouterClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Send one user message and return the first choice's text, trimmed.
    pub async fn complete(&self, prompt: &str, model_id: &str) -> Result<String> {
        let body = json!({
            "model": model_id,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": self.config.temperature
        });

        let started = Instant::now();
        debug!("➡️ [Model] Sending request to {model_id}");
        let resp = self
            .client
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("Model HTTP error")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("model returned {status}: {text}");
        }

        let completion: ChatCompletion = resp.json().await.context("Model JSON decode")?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("model response contained no choices")?;

        info!("✅ [Model] Response received ({}ms)", started.elapsed().as_millis());
        Ok(content.trim().to_string())
    }
}

impl Generator for OpenRouterClient {
    fn generate(&self, prompt: &str, model_id: &str) -> Result<String> {
        // Called from rayon workers; each call drives its own runtime.
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        rt.block_on(self.complete(prompt, model_id))
    }
}

pub(crate) fn build_http_client(config: &ApiConfig) -> Result<Client> {
    Client::builder()
        .gzip(true)
        .connect_timeout(Duration::from_secs(15))
        .timeout(config.timeout)
        // Connections would outlive the per-call runtime that opened them.
        .pool_max_idle_per_host(0)
        .build()
        .context("HTTP client build failed")
}
