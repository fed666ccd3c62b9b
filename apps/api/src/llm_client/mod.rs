/// LLM Client: the single point of entry for every semantic judgment in the pipeline.
///
/// ARCHITECTURAL RULE: stages never talk HTTP to a model directly. They receive a
/// `JudgeHandle`, which wraps any `SemanticJudge` and enforces the caller-side timeout.
///
/// The default backend speaks the OpenAI-compatible chat completions protocol, which
/// is what a local Ollama server exposes under `/v1`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod json;
pub mod prompts;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;
/// Transport-level ceiling. The per-call judgment deadline lives in `JudgeHandle`.
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Semantic judgment timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can answer a `(system, prompt)` pair with free text.
///
/// The response is untrusted: callers extract structured data with
/// [`json::extract_json_block`] and fall back to documented defaults.
#[async_trait]
pub trait SemanticJudge: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Shared judge plus the deadline every call must respect.
#[derive(Clone)]
pub struct JudgeHandle {
    judge: Arc<dyn SemanticJudge>,
    timeout: Duration,
}

impl JudgeHandle {
    pub fn new(judge: Arc<dyn SemanticJudge>, timeout: Duration) -> Self {
        Self { judge, timeout }
    }

    /// Asks the judge, turning a call that outlives the deadline into `LlmError::Timeout`.
    pub async fn ask(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        match tokio::time::timeout(self.timeout, self.judge.complete(system, prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Semantic judgment exceeded {:?}", self.timeout);
                Err(LlmError::Timeout(self.timeout))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP backend
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions client with retry on 429 / 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(base_url: &str, model: String, api_key: Option<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single chat call and returns the first choice's text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat: ChatResponse = response.json().await?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return chat
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|text| !text.trim().is_empty())
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl SemanticJudge for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt, system).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedJudge, StalledJudge};
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url_without_double_slash() {
        let client = LlmClient::new("http://localhost:11434/v1/", "llama3.2".into(), None).unwrap();
        assert_eq!(client.endpoint, "http://localhost:11434/v1/chat/completions");
        assert_eq!(client.model(), "llama3.2");
    }

    #[test]
    fn test_chat_response_deserializes_first_choice() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "{\"match_score\": 70}"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"match_score\": 70}")
        );
        assert_eq!(parsed.usage.unwrap().completion_tokens, 5);
    }

    #[tokio::test]
    async fn test_handle_passes_reply_through() {
        let handle = ScriptedJudge::new(["hello"]).handle();
        assert_eq!(handle.ask("sys", "prompt").await.unwrap(), "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_times_out_stalled_judge() {
        let handle = JudgeHandle::new(Arc::new(StalledJudge), Duration::from_secs(3));
        let err = handle.ask("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(d) if d == Duration::from_secs(3)));
    }
}
