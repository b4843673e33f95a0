//! HTTP completion backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use hcp_crm_core::{CompletionModel, Error, Result};

use crate::LlmError;

/// Completion client configuration
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model name/ID
    pub model: String,
    /// Base endpoint of the OpenAI-compatible API
    pub endpoint: String,
    /// API key (required by hosted providers)
    pub api_key: Option<String>,
    /// Sampling temperature; extraction wants near-deterministic output
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after a transient failure (0 = fail immediately)
    pub max_retries: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gemma2-9b-it".to_string(),
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 1024,
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible chat-completions backend.
///
/// `Client` is cheap to clone; the backend is constructed once at
/// process start and shared behind an `Arc<dyn CompletionModel>`.
#[derive(Clone)]
pub struct CompletionBackend {
    client: Client,
    config: CompletionConfig,
}

impl CompletionBackend {
    pub fn new(config: CompletionConfig) -> std::result::Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    async fn call_once(&self, prompt: &str) -> std::result::Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(self.api_url()).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }

    /// Whether a failed call is worth one more attempt.
    fn is_transient(err: &LlmError) -> bool {
        matches!(err, LlmError::Network(_) | LlmError::Timeout)
    }
}

#[async_trait]
impl CompletionModel for CompletionBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.call_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.config.max_retries && Self::is_transient(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        model = %self.config.model,
                        attempt,
                        error = %e,
                        "completion call failed, retrying"
                    );
                }
                Err(e) => {
                    tracing::warn!(model = %self.config.model, error = %e, "completion call failed");
                    return Err(Error::from(e));
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_cleanly() {
        let backend = CompletionBackend::new(CompletionConfig {
            endpoint: "https://api.groq.com/openai/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.api_url(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_transient_classification() {
        assert!(CompletionBackend::is_transient(&LlmError::Timeout));
        assert!(CompletionBackend::is_transient(&LlmError::Network("reset".into())));
        assert!(!CompletionBackend::is_transient(&LlmError::Api("401".into())));
    }
}
