//! API keys held by the service.
//!
//! Groq, Hugging Face and Razorpay keys are all wrapped in [`ApiCredential`]
//! as soon as they are read. The value lives in a `secrecy::SecretString`,
//! is redacted from `Debug`, and is only exposed where it is written into a
//! request header or used as a MAC key.
//!
//! Lookup order is the options object from the config file, then the
//! environment. Empty strings count as missing in both places.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name} missing: set '{config_key}' in config or the {env_var} environment variable")]
pub struct CredentialError {
    pub name: &'static str,
    pub config_key: String,
    pub env_var: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Config,
    Environment,
    /// Passed straight to a constructor, e.g. in tests
    Programmatic,
}

pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

fn lookup(config: &JsonValue, config_key: &str, env_var: &str) -> Option<(String, CredentialSource)> {
    if let Some(value) = config.get(config_key).and_then(JsonValue::as_str) {
        if !value.is_empty() {
            return Some((value.to_string(), CredentialSource::Config));
        }
    }
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.is_empty())
        .map(|value| (value, CredentialSource::Environment))
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Resolve `config_key` in `config`, else `env_var`.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, CredentialError> {
        lookup(config, config_key, env_var)
            .map(|(value, source)| Self::new(value, source, name))
            .ok_or_else(|| CredentialError {
                name,
                config_key: config_key.to_string(),
                env_var: env_var.to_string(),
            })
    }

    /// Same lookup as [`from_config_or_env`](Self::from_config_or_env), without keeping the value.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        lookup(config, config_key, env_var).is_some()
    }

    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiCredential({}, {:?}, [REDACTED])", self.name, self.source)
    }
}

/// Resolves several credentials that are only useful together, such as the
/// gateway's key id and key secret.
#[derive(Debug, Default)]
pub struct CredentialBuilder {
    wanted: Vec<(&'static str, String, &'static str)>,
}

impl CredentialBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(
        mut self,
        config_key: &'static str,
        env_var: impl Into<String>,
        name: &'static str,
    ) -> Self {
        self.wanted.push((config_key, env_var.into(), name));
        self
    }

    /// Fails on the first credential that cannot be found.
    pub fn build(self, config: &JsonValue) -> Result<CredentialSet, CredentialError> {
        let mut credentials = BTreeMap::new();
        for (config_key, env_var, name) in self.wanted {
            let credential = ApiCredential::from_config_or_env(config, config_key, &env_var, name)?;
            credentials.insert(config_key, credential);
        }
        Ok(CredentialSet { credentials })
    }
}

/// Credentials keyed by their config key.
pub struct CredentialSet {
    credentials: BTreeMap<&'static str, ApiCredential>,
}

impl CredentialSet {
    pub fn take(&mut self, config_key: &str) -> Option<ApiCredential> {
        self.credentials.remove(config_key)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.credentials.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_debug_never_shows_the_key() {
        let key = "gsk_live_0123456789abcdef";
        let credential = ApiCredential::new(key, CredentialSource::Config, "Groq API key");

        let debug = format!("{:?}", credential);
        assert!(!debug.contains(key));
        assert!(debug.contains("Groq API key"));
        assert_eq!(credential.expose(), key);
    }

    #[test]
    fn test_config_wins_over_environment() {
        std::env::set_var("VERDICT_TEST_KEY_PRIORITY", "from-env");
        let credential = ApiCredential::from_config_or_env(
            &json!({"api_key": "from-config"}),
            "api_key",
            "VERDICT_TEST_KEY_PRIORITY",
            "Test key",
        )
        .unwrap();
        std::env::remove_var("VERDICT_TEST_KEY_PRIORITY");

        assert_eq!(credential.expose(), "from-config");
        assert_eq!(credential.source(), CredentialSource::Config);
    }

    #[test]
    fn test_environment_used_when_config_is_empty() {
        std::env::set_var("VERDICT_TEST_KEY_FALLBACK", "from-env");
        let credential = ApiCredential::from_config_or_env(
            &json!({"api_key": ""}),
            "api_key",
            "VERDICT_TEST_KEY_FALLBACK",
            "Test key",
        )
        .unwrap();
        std::env::remove_var("VERDICT_TEST_KEY_FALLBACK");

        assert_eq!(credential.expose(), "from-env");
        assert_eq!(credential.source(), CredentialSource::Environment);
    }

    #[test]
    fn test_missing_everywhere() {
        let options = json!({"key_secret": ""});
        assert!(!ApiCredential::is_available(&options, "key_secret", "VERDICT_TEST_NEVER_SET"));

        let err = ApiCredential::from_config_or_env(
            &options,
            "key_secret",
            "VERDICT_TEST_NEVER_SET",
            "Razorpay key secret",
        )
        .unwrap_err();
        assert_eq!(err.name, "Razorpay key secret");
        assert!(err.to_string().contains("VERDICT_TEST_NEVER_SET"));
    }

    #[test]
    fn test_builder_resolves_all_or_nothing() {
        let options = json!({"key_id": "rzp_test_1", "key_secret": "s3cret"});
        let mut set = CredentialBuilder::new()
            .require("key_id", "VERDICT_TEST_ID_NEVER_SET", "Key id")
            .require("key_secret", "VERDICT_TEST_SECRET_NEVER_SET", "Key secret")
            .build(&options)
            .unwrap();
        assert_eq!(format!("{:?}", set), r#"{"key_id", "key_secret"}"#);
        assert_eq!(set.take("key_secret").unwrap().expose(), "s3cret");
        assert!(set.take("key_secret").is_none());

        let err = CredentialBuilder::new()
            .require("key_id", "VERDICT_TEST_ID_NEVER_SET", "Key id")
            .require("key_secret", "VERDICT_TEST_SECRET_NEVER_SET", "Key secret")
            .build(&json!({"key_id": "rzp_test_1"}))
            .unwrap_err();
        assert_eq!(err.name, "Key secret");
    }
}
