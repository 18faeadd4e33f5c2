//! Text-generation providers.
//!
//! Two backends sit behind [`LlmProvider`]: Groq's OpenAI-compatible chat
//! completions endpoint and the Hugging Face Inference API. Each is behind
//! a cargo feature of the same name. Keys go through [`secrets`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "groq")]
mod groq;
#[cfg(feature = "huggingface")]
mod huggingface;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::{
    ApiCredential, CredentialBuilder, CredentialError, CredentialSet, CredentialSource,
};

#[cfg(feature = "groq")]
pub use groq::{GroqProvider, GroqProviderFactory, GROQ_API_KEY_ENV};
#[cfg(feature = "huggingface")]
pub use huggingface::{HuggingFaceProvider, HuggingFaceProviderFactory, HF_API_TOKEN_ENV};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Model is loading, estimated wait {estimated_wait:?}")]
    ModelLoading { estimated_wait: Option<Duration> },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Empty completion")]
    EmptyCompletion,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl From<secrets::CredentialError> for ProviderError {
    fn from(err: secrets::CredentialError) -> Self {
        ProviderError::NotConfigured(err.to_string())
    }
}

/// Per-request generation settings.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Applied to each HTTP request. The generator bounds the whole call by
    /// [`LlmProvider::call_budget`].
    pub timeout: Duration,
    /// Request a JSON object response where the API supports it
    pub json_mode: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 400,
            temperature: 0.7,
            timeout: Duration::from_secs(15),
            json_mode: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// What came back from one completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    /// Zero when the API does not report usage
    pub usage: TokenUsage,
    pub model: String,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A text-generation backend.
///
/// One `complete` call is one HTTP request. A provider may wait and retry
/// once when the API reports the model is still loading; nothing else is
/// retried at this layer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Whether the provider holds what it needs to make a call.
    async fn health_check(&self) -> bool;

    /// Upper bound on one `complete` call, including any loading wait and
    /// its retry.
    fn call_budget(&self, config: &CompletionConfig) -> Duration {
        config.timeout
    }

    fn name(&self) -> &str;
}

/// Map a reqwest send failure onto a provider error.
pub(crate) fn send_error(error: reqwest::Error, timeout: Duration) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::HttpError(error.to_string())
    }
}

/// Parse a `retry-after` header in whole seconds.
pub(crate) fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}
