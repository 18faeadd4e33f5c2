//! Runtime configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no
//! file) gives a working fallback-only service priced at ₹5.
//!
//! ```yaml
//! llm:
//!   provider: groq
//!   timeout: 15s
//!   options:
//!     api_key: gsk_...        # or GROQ_API_KEY
//! payment:
//!   price_minor: 500
//!   options:
//!     key_id: rzp_live_...    # or RAZORPAY_KEY_ID
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use verdict_core::SignatureVerifier;

use crate::generator::VerdictGenerator;
use crate::payment::{PaymentGateway, RazorpayGateway, RAZORPAY_KEY_SECRET_ENV};
use crate::providers::secrets::ApiCredential;
use crate::providers::{CompletionConfig, ProviderRegistry};
use crate::validation::{ResponseValidator, DEFAULT_MIN_RESPONSE_CHARS};

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub llm: LlmSettings,
    pub payment: PaymentSettings,
}

/// Text-generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider name: `groq`, `huggingface` or `none`
    pub provider: String,

    /// Model override; the provider's default when unset
    pub model: Option<String>,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Per HTTP request; a model-loading retry gets its own
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Responses this short or shorter are rejected
    pub min_response_chars: usize,

    /// Provider options, e.g. `api_key`, `base_url`
    pub options: JsonValue,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: None,
            max_tokens: 400,
            temperature: 0.7,
            timeout: Duration::from_secs(15),
            min_response_chars: DEFAULT_MIN_RESPONSE_CHARS,
            options: JsonValue::Object(Default::default()),
        }
    }
}

/// Payment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettings {
    pub enabled: bool,

    /// Gateway API root; the gateway default when unset
    pub base_url: Option<String>,

    pub currency: String,

    /// Price of one verdict in the currency's minor unit
    pub price_minor: u64,

    pub receipt_prefix: String,

    /// How much of the user's text is stored in the order notes
    pub notes_input_chars: usize,

    /// Hosted checkout page the payment page redirects to
    pub checkout_url: String,

    /// Gateway credentials, `key_id` and `key_secret`
    pub options: JsonValue,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            currency: "INR".to_string(),
            price_minor: 500,
            receipt_prefix: "receipt_".to_string(),
            notes_input_chars: 100,
            checkout_url: "https://razorpay.me/@omniweb".to_string(),
            options: JsonValue::Object(Default::default()),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Invalid("llm.max_tokens must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.timeout.is_zero() {
            return Err(ConfigError::Invalid("llm.timeout must be positive".into()));
        }
        if self.payment.price_minor == 0 {
            return Err(ConfigError::Invalid("payment.price_minor must be positive".into()));
        }
        if self.payment.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("payment.currency must not be empty".into()));
        }
        Ok(())
    }

    /// Build the generator.
    ///
    /// A missing credential or unknown provider is logged and produces a
    /// fallback-only generator; it never fails startup.
    pub fn build_generator(&self) -> VerdictGenerator {
        let settings = &self.llm;
        let validator = ResponseValidator::new(settings.min_response_chars);

        if settings.provider.eq_ignore_ascii_case("none") {
            tracing::info!("AI generation disabled, using fallback verdicts only");
            return VerdictGenerator::builder().validator(validator).build();
        }

        let registry = ProviderRegistry::with_defaults();
        let provider = match registry.create(&settings.provider, &settings.options) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!(
                    provider = %settings.provider,
                    error = %e,
                    "Provider unavailable, skipping AI generation"
                );
                return VerdictGenerator::builder().validator(validator).build();
            }
        };

        let model = settings
            .model
            .clone()
            .or_else(|| registry.default_model(&settings.provider).map(str::to_string))
            .unwrap_or_else(|| CompletionConfig::default().model);

        tracing::info!(provider = provider.name(), model = %model, "AI generation enabled");

        VerdictGenerator::builder()
            .provider(provider)
            .validator(validator)
            .completion(CompletionConfig {
                model,
                max_tokens: settings.max_tokens,
                temperature: settings.temperature,
                timeout: settings.timeout,
                json_mode: true,
            })
            .build()
    }

    /// Build the order gateway, or `None` when payments are off or
    /// credentials are missing.
    pub fn build_gateway(&self) -> Option<Arc<dyn PaymentGateway>> {
        if !self.payment.enabled {
            tracing::info!("Payments disabled");
            return None;
        }

        match RazorpayGateway::from_config(&self.payment.options) {
            Ok(gateway) => {
                let gateway = match &self.payment.base_url {
                    Some(url) => gateway.with_base_url(url.as_str()),
                    None => gateway,
                };
                Some(Arc::new(gateway))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Payment gateway unavailable");
                None
            }
        }
    }

    /// Signature verifier from the gateway key secret alone.
    pub fn build_verifier(&self) -> Option<SignatureVerifier> {
        match ApiCredential::from_config_or_env(
            &self.payment.options,
            "key_secret",
            RAZORPAY_KEY_SECRET_ENV,
            "Razorpay key secret",
        ) {
            Ok(secret) => Some(SignatureVerifier::new(secret.expose())),
            Err(e) => {
                tracing::warn!(error = %e, "Payment verification unavailable");
                None
            }
        }
    }
}

/// Serde adapter for humantime strings such as `"15s"` or `"1m 30s"`.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.max_tokens, 400);
        assert_eq!(config.llm.timeout, Duration::from_secs(15));
        assert_eq!(config.llm.min_response_chars, 50);
        assert_eq!(config.payment.price_minor, 500);
        assert_eq!(config.payment.currency, "INR");
        assert_eq!(config.payment.notes_input_chars, 100);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
llm:
  provider: huggingface
  model: test/model
  timeout: 1m 30s
  temperature: 0.2
  options:
    api_key: hf_test
    loading_wait_cap: 5s
payment:
  enabled: false
  currency: USD
  price_minor: 99
  checkout_url: https://pay.example.com/verdict
"#;
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.provider, "huggingface");
        assert_eq!(config.llm.model.as_deref(), Some("test/model"));
        assert_eq!(config.llm.timeout, Duration::from_secs(90));
        assert_eq!(config.llm.options["loading_wait_cap"], "5s");
        assert!(!config.payment.enabled);
        assert_eq!(config.payment.price_minor, 99);
        assert_eq!(config.payment.receipt_prefix, "receipt_");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RuntimeConfig::from_yaml("llm:\n  temperature: 3.5\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("payment:\n  price_minor: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("llm:\n  timeout: soon\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_provider_none_is_offline() {
        let config = RuntimeConfig::from_yaml("llm:\n  provider: none\n").unwrap();
        assert_eq!(config.build_generator().provider_name(), None);
    }

    #[test]
    fn test_unknown_provider_is_offline() {
        let config = RuntimeConfig::from_yaml("llm:\n  provider: nonexistent\n").unwrap();
        assert_eq!(config.build_generator().provider_name(), None);
    }

    #[cfg(feature = "groq")]
    #[test]
    fn test_groq_with_key_is_online() {
        let yaml = "llm:\n  provider: groq\n  options:\n    api_key: gsk_test\n";
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.build_generator().provider_name(), Some("groq"));
    }

    #[test]
    fn test_gateway_and_verifier_from_options() {
        let yaml = "payment:\n  options:\n    key_id: rzp_test\n    key_secret: shh\n";
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert!(config.build_gateway().is_some());
        assert!(config.build_verifier().is_some());

        let disabled = RuntimeConfig::from_yaml(
            "payment:\n  enabled: false\n  options:\n    key_id: a\n    key_secret: b\n",
        )
        .unwrap();
        assert!(disabled.build_gateway().is_none());
    }

    #[test]
    fn test_timeout_round_trips_as_humantime() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("timeout: 15s"));
    }
}
