use std::time::Duration;

use crate::error::{InsightError, Result};

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Connection settings for the hosted model, resolved once at process start.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Read the credential (and optional base URL) from the process environment.
    pub fn from_env(timeout_seconds: u64) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), timeout_seconds)
    }

    pub fn from_lookup<F>(lookup: F, timeout_seconds: u64) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InsightError::MissingCredential(API_KEY_VAR.to_string()))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url, timeout_seconds))
    }

    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_key_is_a_startup_error() {
        let err = ApiConfig::from_lookup(lookup(&[]), 30).unwrap_err();
        assert!(matches!(err, InsightError::MissingCredential(ref v) if v == API_KEY_VAR));

        let err = ApiConfig::from_lookup(lookup(&[(API_KEY_VAR, "  ")]), 30).unwrap_err();
        assert!(matches!(err, InsightError::MissingCredential(_)));
    }

    #[test]
    fn defaults_base_url() {
        let cfg = ApiConfig::from_lookup(lookup(&[(API_KEY_VAR, "sk-test")]), 30).unwrap();
        assert_eq!(cfg.api_key, "sk-test");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.endpoint("chat/completions"), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let cfg = ApiConfig::from_lookup(
            lookup(&[(API_KEY_VAR, "k"), (BASE_URL_VAR, "http://localhost:9000/v1/")]),
            5,
        )
        .unwrap();
        assert_eq!(cfg.endpoint("/audio/transcriptions"), "http://localhost:9000/v1/audio/transcriptions");
    }
}
