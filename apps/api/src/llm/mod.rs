//! Request dispatcher — the single point of entry for all AI backend calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to a provider API directly.
//! All model interactions MUST go through `Dispatcher::dispatch`.
//!
//! Each provider has exactly one transport: OpenAI and Ollama Cloud speak the
//! chat-completion shape (message array in, one text out, native JSON mode);
//! Gemini and a local Ollama speak a raw-generate shape (single prompt in,
//! one text out, no JSON mode — callers recover JSON downstream).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, ProviderSettings};
use crate::providers::Provider;

pub mod prompts;
pub mod retry;

use self::retry::RetryPolicy;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,

    /// Dispatch reached a provider with no settings. The registry only hands
    /// out configured providers, so hitting this is a programming error.
    #[error("provider '{0}' is not configured")]
    NotConfigured(&'static str),
}

impl LlmError {
    /// Transient transport failures worth retrying: connection-level errors,
    /// timeouts, rate limits, and server-side 5xx. Malformed or empty model
    /// output is never retryable here.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyContent | LlmError::NotConfigured(_) => false,
        }
    }
}

/// Whether the caller wants the transport's native structured-JSON mode.
/// Raw-generate transports have none and ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    JsonObject,
    Text,
}

// ── Chat-completion wire types (OpenAI, Ollama Cloud) ───────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ChatResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ── Gemini generateContent wire types ───────────────────────────────────────

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

// ── Ollama generate wire types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

/// The shared dispatcher used by all pipeline stages.
///
/// Holds one HTTP client with an explicit request timeout. No caching: every
/// dispatch is a live round trip, one request in flight per call. Retry is a
/// caller-supplied policy, not baked into the transport.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    config: Config,
}

impl Dispatcher {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            config,
        }
    }

    /// Sends `prompt` to `provider`/`model` and returns the raw text reply.
    ///
    /// Only failures classified retryable by [`LlmError::is_retryable`] are
    /// reattempted, with the policy's exponential backoff. Everything else
    /// returns immediately.
    pub async fn dispatch(
        &self,
        provider: Provider,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
        retry: &RetryPolicy,
    ) -> Result<String, LlmError> {
        let attempts = retry.max_attempts.max(1);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = retry.delay_for(attempt);
                warn!(
                    "dispatch to '{}' failed (attempt {}/{}), retrying after {}ms",
                    provider.id(),
                    attempt,
                    attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.send_once(provider, model, prompt, format).await {
                Ok(text) => {
                    debug!(
                        "dispatch to '{}' model '{}' returned {} chars",
                        provider.id(),
                        model,
                        text.len()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    async fn send_once(
        &self,
        provider: Provider,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, LlmError> {
        let text = match provider {
            Provider::OpenAi | Provider::OllamaCloud => {
                self.chat_completion(provider, model, prompt, format).await?
            }
            Provider::Gemini => self.gemini_generate(model, prompt).await?,
            Provider::OllamaLocal => self.ollama_generate(model, prompt).await?,
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }

    fn settings_for(&self, provider: Provider) -> Result<&ProviderSettings, LlmError> {
        let settings = match provider {
            Provider::Gemini => self.config.gemini.as_ref(),
            Provider::OpenAi => self.config.openai.as_ref(),
            Provider::OllamaLocal => self.config.ollama_local.as_ref(),
            Provider::OllamaCloud => self.config.ollama_cloud.as_ref(),
        };
        settings.ok_or(LlmError::NotConfigured(provider.id()))
    }

    /// Chat-completion transport: OpenAI-compatible `messages` array, text in
    /// `choices[0].message.content`, native JSON mode via `response_format`.
    async fn chat_completion(
        &self,
        provider: Provider,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, LlmError> {
        let settings = self.settings_for(provider)?;
        let url = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );

        let request_body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: (format == ResponseFormat::JsonObject)
                .then_some(ChatResponseFormat {
                    kind: "json_object",
                }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&settings.api_key)
            .json(&request_body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)
    }

    /// Raw-generate transport, Gemini shape: single-prompt `generateContent`,
    /// text in `candidates[0].content.parts[0].text`. No JSON mode.
    async fn gemini_generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let settings = self.settings_for(Provider::Gemini)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            model
        );

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &settings.api_key)
            .json(&request_body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let parsed: GeminiResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(LlmError::EmptyContent)
    }

    /// Raw-generate transport, Ollama shape: `/api/generate` with a single
    /// prompt string, text in `response`. No auth, no JSON mode.
    async fn ollama_generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let settings = self.settings_for(Provider::OllamaLocal)?;
        let url = format!("{}/api/generate", settings.base_url.trim_end_matches('/'));

        let request_body = OllamaGenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&url).json(&request_body).send().await?;
        let response = ensure_success(response).await?;

        let parsed: OllamaGenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extracts the first top-level `{...}` object from model output: the slice
/// from the first `{` to the last `}`. Defends against prose or markdown
/// fencing wrapped around a single JSON object.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;

    fn config_with_openai(base_url: String) -> Config {
        Config {
            gemini: None,
            openai: Some(ProviderSettings {
                api_key: "test-key".to_string(),
                base_url,
                models: vec!["gpt-4o".to_string()],
            }),
            ollama_local: None,
            ollama_cloud: None,
            default_provider: None,
            selection_path: "provider_selection.json".into(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    fn config_with_ollama(base_url: String) -> Config {
        Config {
            ollama_local: Some(ProviderSettings {
                api_key: String::new(),
                base_url,
                models: vec!["llama3.1".to_string()],
            }),
            ..config_with_openai("http://unused".to_string())
        }
    }

    fn config_with_gemini(base_url: String) -> Config {
        Config {
            gemini: Some(ProviderSettings {
                api_key: "test-key".to_string(),
                base_url,
                models: vec!["gemini-2.5-pro".to_string()],
            }),
            openai: None,
            ..config_with_openai("http://unused".to_string())
        }
    }

    #[test]
    fn test_first_json_object_plain() {
        assert_eq!(
            first_json_object(r#"{"key": "value"}"#),
            Some(r#"{"key": "value"}"#)
        );
    }

    #[test]
    fn test_first_json_object_wrapped_in_prose_and_fences() {
        let input = "Sure! Here is the JSON:\n```json\n{\"key\": {\"nested\": 1}}\n```\nHope that helps.";
        assert_eq!(first_json_object(input), Some("{\"key\": {\"nested\": 1}}"));
    }

    #[test]
    fn test_first_json_object_none_when_no_braces() {
        assert_eq!(first_json_object("no json here"), None);
    }

    #[test]
    fn test_first_json_object_none_when_braces_reversed() {
        assert_eq!(first_json_object("} backwards {"), None);
    }

    #[test]
    fn test_api_error_retryable_classification() {
        assert!(LlmError::Api {
            status: 429,
            message: String::new()
        }
        .is_retryable());
        assert!(LlmError::Api {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!LlmError::Api {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!LlmError::EmptyContent.is_retryable());
    }

    #[tokio::test]
    async fn test_chat_completion_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"ok\":true}"}}]}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_openai(server.url()));
        let text = dispatcher
            .dispatch(
                Provider::OpenAi,
                "gpt-4o",
                "hello",
                ResponseFormat::JsonObject,
                &RetryPolicy::none(),
            )
            .await
            .unwrap();

        assert_eq!(text, r#"{"ok":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_completion_client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body("bad request")
            .expect(1)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_openai(server.url()));
        let err = dispatcher
            .dispatch(
                Provider::OpenAi,
                "gpt-4o",
                "hello",
                ResponseFormat::Text,
                &RetryPolicy::standard(),
            )
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, .. } => assert_eq!(status, 400),
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried_per_policy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_openai(server.url()));
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: std::time::Duration::from_millis(1),
            max_delay: std::time::Duration::from_millis(4),
        };
        let err = dispatcher
            .dispatch(
                Provider::OpenAi,
                "gpt-4o",
                "hello",
                ResponseFormat::Text,
                &policy,
            )
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, .. } => assert_eq!(status, 503),
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_chat_content_is_empty_content_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_openai(server.url()));
        let err = dispatcher
            .dispatch(
                Provider::OpenAi,
                "gpt-4o",
                "hello",
                ResponseFormat::Text,
                &RetryPolicy::none(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_ollama_generate_returns_response_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"{\"name\":\"Jane\"}","done":true}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_ollama(server.url()));
        let text = dispatcher
            .dispatch(
                Provider::OllamaLocal,
                "llama3.1",
                "hello",
                ResponseFormat::JsonObject,
                &RetryPolicy::none(),
            )
            .await
            .unwrap();
        assert_eq!(text, r#"{"name":"Jane"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_generate_reads_first_candidate_part() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":1}"}],"role":"model"}}]}"#,
            )
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(config_with_gemini(server.url()));
        let text = dispatcher
            .dispatch(
                Provider::Gemini,
                "gemini-2.5-pro",
                "hello",
                ResponseFormat::Text,
                &RetryPolicy::none(),
            )
            .await
            .unwrap();
        assert_eq!(text, r#"{"a":1}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_fast() {
        let dispatcher = Dispatcher::new(config_with_openai("http://unused".to_string()));
        let err = dispatcher
            .dispatch(
                Provider::Gemini,
                "gemini-2.5-pro",
                "hello",
                ResponseFormat::Text,
                &RetryPolicy::none(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured("gemini")));
    }
}
