//! Hugging Face Inference API provider.
//!
//! Serverless inference models are unloaded when idle. The first request
//! after a cold start gets `503` with an `estimated_time` in the body; this
//! provider waits for that estimate (capped) and retries exactly once.

use super::{
    factory::{validate_base_url, ProviderFactory},
    retry_after, send_error,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, Role,
    TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the Hugging Face API token.
pub const HF_API_TOKEN_ENV: &str = "HF_API_TOKEN";

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
const DEFAULT_LOADING_WAIT_CAP: Duration = Duration::from_secs(10);

/// Hugging Face Inference API provider.
pub struct HuggingFaceProvider {
    credential: ApiCredential,
    base_url: String,
    loading_wait_cap: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("loading_wait_cap", &self.loading_wait_cap)
            .finish()
    }
}

impl HuggingFaceProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(
                api_token,
                CredentialSource::Programmatic,
                "Hugging Face API token",
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
            loading_wait_cap: DEFAULT_LOADING_WAIT_CAP,
            client: reqwest::Client::new(),
        }
    }

    /// Create from JSON options with environment fallback.
    ///
    /// Reads `api_key` (or `HF_API_TOKEN`), `base_url` and
    /// `loading_wait_cap` (humantime string such as `"10s"`).
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            HF_API_TOKEN_ENV,
            "Hugging Face API token",
        )?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let loading_wait_cap = match config["loading_wait_cap"].as_str() {
            Some(raw) => humantime::parse_duration(raw).map_err(|e| {
                ProviderError::NotConfigured(format!("invalid loading_wait_cap '{}': {}", raw, e))
            })?,
            None => DEFAULT_LOADING_WAIT_CAP,
        };

        Ok(Self {
            credential,
            base_url,
            loading_wait_cap,
            client: reqwest::Client::new(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upper bound on the wait before the single model-loading retry.
    pub fn with_loading_wait_cap(mut self, cap: Duration) -> Self {
        self.loading_wait_cap = cap;
        self
    }

    /// Flatten chat messages into one instruction prompt.
    fn render_prompt(messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();
        for message in messages {
            match message.role {
                Role::System => {
                    prompt.push_str(&message.content);
                    prompt.push_str("\n\n");
                }
                Role::Assistant => {
                    prompt.push_str("Assistant: ");
                    prompt.push_str(&message.content);
                    prompt.push('\n');
                }
                Role::User => {
                    prompt.push_str("User: ");
                    prompt.push_str(&message.content);
                    prompt.push('\n');
                }
            }
        }
        prompt.push_str("Assistant:");
        prompt
    }

    async fn send_once(
        &self,
        prompt: &str,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: config.max_tokens,
                temperature: config.temperature,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}", self.base_url, config.model))
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, config.timeout))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited {
                retry_after: retry_after(&response),
            });
        }

        if status.as_u16() == 503 {
            let text = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<InferenceError>(&text) {
                Ok(InferenceError {
                    estimated_time: Some(secs),
                    ..
                }) => Err(ProviderError::ModelLoading {
                    estimated_wait: Duration::try_from_secs_f64(secs).ok(),
                }),
                Ok(InferenceError { error, .. }) => Err(ProviderError::ApiError {
                    status: 503,
                    message: error,
                }),
                Err(_) => Err(ProviderError::ApiError {
                    status: 503,
                    message: text,
                }),
            };
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<InferenceError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or(ProviderError::EmptyCompletion)?;

        Ok(CompletionResponse {
            content,
            usage: TokenUsage::default(),
            model: config.model.clone(),
            stop_reason: None,
        })
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let prompt = Self::render_prompt(&messages);

        match self.send_once(&prompt, config).await {
            Err(ProviderError::ModelLoading { estimated_wait }) => {
                let wait = estimated_wait
                    .unwrap_or(self.loading_wait_cap)
                    .min(self.loading_wait_cap);
                tracing::info!(
                    model = %config.model,
                    wait_ms = wait.as_millis() as u64,
                    "Model loading, retrying once"
                );
                tokio::time::sleep(wait).await;
                self.send_once(&prompt, config).await
            }
            other => other,
        }
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Two requests plus the capped loading wait between them.
    fn call_budget(&self, config: &CompletionConfig) -> Duration {
        config.timeout * 2 + self.loading_wait_cap
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Factory for creating Hugging Face providers from configuration.
///
/// ## Options
/// ```json
/// {
///   "api_key": "hf_...",               // Optional, falls back to HF_API_TOKEN
///   "base_url": "https://...",         // Optional
///   "loading_wait_cap": "10s"          // Optional
/// }
/// ```
pub struct HuggingFaceProviderFactory;

impl ProviderFactory for HuggingFaceProviderFactory {
    fn provider_type(&self) -> &'static str {
        "huggingface"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(HuggingFaceProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiCredential::is_available(config, "api_key", HF_API_TOKEN_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "Hugging Face API token required: set 'api_key' in config or {} env",
                HF_API_TOKEN_ENV
            )));
        }
        validate_base_url(config)
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn description(&self) -> &'static str {
        "Hugging Face serverless Inference API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> CompletionConfig {
        CompletionConfig {
            model: "test/model".to_string(),
            timeout: Duration::from_secs(5),
            ..CompletionConfig::default()
        }
    }

    #[test]
    fn test_render_prompt() {
        let prompt = HuggingFaceProvider::render_prompt(&[
            ChatMessage::system("Be brief."),
            ChatMessage::user("Should I?"),
        ]);
        assert_eq!(prompt, "Be brief.\n\nUser: Should I?\nAssistant:");
    }

    #[test]
    fn test_from_config_wait_cap() {
        let provider = HuggingFaceProvider::from_config(&serde_json::json!({
            "api_key": "hf_test",
            "loading_wait_cap": "250ms"
        }))
        .unwrap();
        assert_eq!(provider.loading_wait_cap, Duration::from_millis(250));

        let bad = HuggingFaceProvider::from_config(&serde_json::json!({
            "api_key": "hf_test",
            "loading_wait_cap": "soon"
        }));
        assert!(matches!(bad, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_call_budget_covers_loading_retry() {
        let provider =
            HuggingFaceProvider::new("hf_test").with_loading_wait_cap(Duration::from_millis(300));
        let config = CompletionConfig {
            timeout: Duration::from_millis(200),
            ..CompletionConfig::default()
        };
        assert_eq!(provider.call_budget(&config), Duration::from_millis(700));
    }

    #[test]
    fn test_token_not_in_debug_output() {
        let provider = HuggingFaceProvider::new("hf_super_secret");
        let debug_output = format!("{:?}", provider);
        assert!(!debug_output.contains("hf_super_secret"));
    }

    #[tokio::test]
    async fn test_complete_parses_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/model"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "{\"verdict\":\"YES\"}"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new("hf_test").with_base_url(server.uri());
        let response = provider
            .complete(vec![ChatMessage::user("hi")], &config())
            .await
            .unwrap();
        assert_eq!(response.content, "{\"verdict\":\"YES\"}");
        assert_eq!(response.model, "test/model");
    }

    #[tokio::test]
    async fn test_model_loading_retries_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/model"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model test/model is currently loading",
                "estimated_time": 20.0
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/test/model"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"generated_text": "ready"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new("hf_test")
            .with_base_url(server.uri())
            .with_loading_wait_cap(Duration::from_millis(10));
        let response = provider
            .complete(vec![ChatMessage::user("hi")], &config())
            .await
            .unwrap();
        assert_eq!(response.content, "ready");
    }

    #[tokio::test]
    async fn test_model_loading_twice_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "loading",
                "estimated_time": 1.5
            })))
            .expect(2)
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new("hf_test")
            .with_base_url(server.uri())
            .with_loading_wait_cap(Duration::from_millis(5));
        let result = provider
            .complete(vec![ChatMessage::user("hi")], &config())
            .await;
        assert!(matches!(result, Err(ProviderError::ModelLoading { .. })));
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "bad input"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new("hf_test").with_base_url(server.uri());
        match provider.complete(vec![ChatMessage::user("hi")], &config()).await {
            Err(ProviderError::ApiError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.content)),
        }
    }
}
