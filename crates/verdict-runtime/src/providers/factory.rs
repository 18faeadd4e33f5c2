//! Name-to-provider lookup.
//!
//! `llm.provider` in the config file is a plain string. Each compiled-in
//! backend registers a [`ProviderFactory`] under that string and builds
//! itself from `llm.options`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{LlmProvider, ProviderError};

pub trait ProviderFactory: Send + Sync {
    /// Registry key, as written in config.
    fn provider_type(&self) -> &'static str;

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Cheap check that credentials and options are usable.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;

    /// Model used when `llm.model` is unset.
    fn default_model(&self) -> &'static str;

    fn description(&self) -> &'static str;
}

#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every provider enabled by cargo features.
    #[allow(unused_mut)]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "groq")]
        registry.register(Arc::new(super::GroqProviderFactory));
        #[cfg(feature = "huggingface")]
        registry.register(Arc::new(super::HuggingFaceProviderFactory));
        registry
    }

    /// Later registrations under the same key win.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(factory.provider_type(), factory);
    }

    /// Validate `config`, then build the provider named `provider_type`.
    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.factory(provider_type)?;
        factory.validate_config(config)?;
        factory.create(config)
    }

    pub fn default_model(&self, provider_type: &str) -> Option<&'static str> {
        self.factories.get(provider_type).map(|f| f.default_model())
    }

    pub fn provider_types(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    fn factory(&self, provider_type: &str) -> Result<&Arc<dyn ProviderFactory>, ProviderError> {
        self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{}', expected one of {:?}",
                provider_type,
                self.provider_types()
            ))
        })
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let described: Vec<_> = self
            .factories
            .values()
            .map(|factory| (factory.provider_type(), factory.description()))
            .collect();
        f.debug_struct("ProviderRegistry")
            .field("providers", &described)
            .finish()
    }
}

/// `base_url`, when given, must be an http(s) URL.
pub(crate) fn validate_base_url(config: &JsonValue) -> Result<(), ProviderError> {
    match config.get("base_url").and_then(JsonValue::as_str) {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
            ProviderError::NotConfigured(format!("base_url must be an http(s) URL, got '{}'", url)),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, TokenUsage};
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: messages.last().map(|m| m.content.clone()).unwrap_or_default(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: None,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    /// Accepts options only when `"ready": true`.
    struct EchoFactory;

    impl ProviderFactory for EchoFactory {
        fn provider_type(&self) -> &'static str {
            "echo"
        }

        fn create(&self, _config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            Ok(Arc::new(EchoProvider))
        }

        fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
            if config["ready"].as_bool() == Some(true) {
                Ok(())
            } else {
                Err(ProviderError::NotConfigured("echo not ready".to_string()))
            }
        }

        fn default_model(&self) -> &'static str {
            "echo-1"
        }

        fn description(&self) -> &'static str {
            "Echoes the last message"
        }
    }

    fn registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoFactory));
        registry
    }

    #[test]
    fn test_create_registered_provider() {
        let registry = registry();
        let provider = registry
            .create("echo", &serde_json::json!({"ready": true}))
            .unwrap();
        assert_eq!(provider.name(), "echo");
        assert_eq!(registry.default_model("echo"), Some("echo-1"));
        assert_eq!(registry.default_model("groq-ish"), None);
    }

    #[test]
    fn test_create_validates_first() {
        let err = registry()
            .create("echo", &serde_json::json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(ref m) if m == "echo not ready"));
    }

    #[test]
    fn test_unknown_provider_lists_known_ones() {
        match registry().create("openai", &serde_json::json!({})) {
            Err(ProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("unknown provider 'openai'"));
                assert!(msg.contains("echo"));
            }
            _ => panic!("expected NotConfigured"),
        }
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url(&serde_json::json!({})).is_ok());
        assert!(validate_base_url(&serde_json::json!({"base_url": "http://127.0.0.1:9"})).is_ok());
        assert!(validate_base_url(&serde_json::json!({"base_url": "ftp://x"})).is_err());
    }

    #[cfg(all(feature = "groq", feature = "huggingface"))]
    #[test]
    fn test_defaults_include_both_backends() {
        assert_eq!(
            ProviderRegistry::with_defaults().provider_types(),
            vec!["groq", "huggingface"]
        );
    }
}
