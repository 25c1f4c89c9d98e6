//! OpenRouter completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider failures, classified for the retry policy.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("provider infrastructure error: {0}")]
    Upstream(String),

    #[error("provider request timed out: {0}")]
    Timeout(String),

    #[error("unexpected provider error: {0}")]
    Unknown(String),
}

/// Text-completion client consumed by the generation stage.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one completion request and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// OpenRouter-backed completion client.
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OpenRouterClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from `OPENROUTER_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY must be set"))?;
        let base_url = std::env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self::new(base_url, api_key, model, timeout)
    }

    async fn chat(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.5,
            max_tokens,
        };

        let mut builder = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(read_error_body(response).await));
        }
        if status.is_server_error() {
            return Err(ProviderError::Upstream(format!(
                "{}: {}",
                status,
                read_error_body(response).await
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::Unknown(format!(
                "{}: {}",
                status,
                read_error_body(response).await
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed completion response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ProviderError::Unknown("completion response contained no content".to_string())
            })
    }

    /// Quick provider health probe: a tiny completion with a short budget.
    pub async fn check_health(&self) -> bool {
        match self.chat("Hello", Some(5), Some(HEALTH_CHECK_TIMEOUT)).await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "provider health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.chat(prompt, None, None).await
    }
}

fn classify_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Unknown(err.to_string())
    }
}

async fn read_error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
