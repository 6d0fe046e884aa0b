use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{ApiConfig, TRANSCRIPTION_MODEL};
use crate::generate::build_http_client;

/// Returned in place of a transcript when the audio could not be turned into text.
pub const TRANSCRIPTION_FAILED: &str = "Sorry, the audio could not be transcribed.";

pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

impl<F> Transcriber for F
where
    F: Fn(&[u8]) -> Result<String> + Send + Sync,
{
    fn transcribe(&self, audio: &[u8]) -> Result<String> {
        self(audio)
    }
}

/// Never fails: backend errors and empty transcripts resolve to [`TRANSCRIPTION_FAILED`].
pub fn transcribe_or_sentinel(transcriber: &dyn Transcriber, audio: &[u8]) -> String {
    match transcriber.transcribe(audio) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("⚠️ [Audio] Empty transcript");
            TRANSCRIPTION_FAILED.to_string()
        }
        Err(e) => {
            warn!("⚠️ [Audio] Transcription failed: {e:#}");
            TRANSCRIPTION_FAILED.to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// OpenAI-compatible `audio/transcriptions` endpoint.
pub struct WhisperClient {
    client: Client,
    config: ApiConfig,
    file_name: String,
}

impl WhisperClient {
    pub fn new(config: ApiConfig, file_name: impl Into<String>) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self {
            client,
            config,
            file_name: file_name.into(),
        })
    }

    pub async fn transcribe_async(&self, audio: &[u8]) -> Result<String> {
        let part = Part::bytes(audio.to_vec()).file_name(self.file_name.clone());
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        info!("🎙️ [Audio] Uploading {} bytes for transcription", audio.len());
        let resp = self
            .client
            .post(self.config.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription HTTP error")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("transcription returned {status}: {text}");
        }

        let body: TranscriptionResponse = resp.json().await.context("Transcription JSON decode")?;
        Ok(body.text)
    }
}

impl Transcriber for WhisperClient {
    fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        rt.block_on(self.transcribe_async(audio))
    }
}
