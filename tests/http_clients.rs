use anyhow::Result;
use chat_insights::config::ApiConfig;
use chat_insights::generate::{generate_insight, Generator, OpenRouterClient};
use chat_insights::transcribe::{transcribe_or_sentinel, Transcriber, WhisperClient, TRANSCRIPTION_FAILED};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ApiConfig {
    ApiConfig::new("sk-test", server.uri(), 5)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

#[tokio::test]
async fn complete_sends_prompt_and_returns_trimmed_content() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "openai/gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": "Analyze this" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "\n Summary: late parcel\nSentiment: Negative\n",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(config(&server))?;
    let text = client.complete("Analyze this", "openai/gpt-3.5-turbo").await?;
    assert_eq!(text, "Summary: late parcel\nSentiment: Negative");
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_an_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(config(&server))?;
    let err = client.complete("p", "m").await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("429"), "{msg}");
    assert!(msg.contains("rate limited"), "{msg}");
    Ok(())
}

#[tokio::test]
async fn empty_choices_is_an_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(config(&server))?;
    assert!(client.complete("p", "m").await.is_err());
    Ok(())
}

#[test]
fn blocking_generator_turns_server_failure_into_content() -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = OpenRouterClient::new(config(&server))?;
    let insight = generate_insight(&client, "p", "m");
    assert!(insight.starts_with("Error:"), "{insight}");
    assert!(insight.contains("upstream down"), "{insight}");

    rt.block_on(server.verify());
    Ok(())
}

#[test]
fn blocking_generator_returns_model_text() -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sentiment: Positive")))
            .mount(&server)
            .await;
        server
    });

    let client = OpenRouterClient::new(config(&server))?;
    assert_eq!(client.generate("p", "m")?, "Sentiment: Positive");
    Ok(())
}

#[test]
fn unreachable_server_becomes_error_content() -> Result<()> {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = OpenRouterClient::new(ApiConfig::new("k", "http://127.0.0.1:9", 2))?;
    let insight = generate_insight(&client, "p", "m");
    assert!(insight.starts_with("Error: "), "{insight}");
    Ok(())
}

#[test]
fn whisper_client_transcribes_and_falls_back_to_sentinel() -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "I was charged twice" })))
            .mount(&server)
            .await;
        server
    });

    let whisper = WhisperClient::new(config(&server), "voice.wav")?;
    assert_eq!(whisper.transcribe(b"RIFF....WAVE")?, "I was charged twice");
    assert_eq!(transcribe_or_sentinel(&whisper, b"RIFF....WAVE"), "I was charged twice");

    let broken = WhisperClient::new(ApiConfig::new("k", "http://127.0.0.1:9", 2), "voice.wav")?;
    assert_eq!(transcribe_or_sentinel(&broken, b"RIFF"), TRANSCRIPTION_FAILED);
    Ok(())
}
