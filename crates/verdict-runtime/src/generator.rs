//! Verdict generation with deterministic fallback.
//!
//! The generator makes one provider call per request:
//! - the call is bounded by the configured timeout
//! - the response goes through [`ResponseValidator`]
//! - anything short of an accepted verdict ends in [`FallbackSelector`]
//!
//! Generation never returns an error. The caller learns which path
//! produced the verdict from [`GeneratedVerdict::source`].

use std::sync::Arc;

use serde::Serialize;
use verdict_core::{FallbackSelector, Verdict, VerdictRequest};

use crate::prompts;
use crate::providers::{CompletionConfig, LlmProvider};
use crate::validation::ResponseValidator;

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Accepted model output
    Ai,
    /// Deterministic template selection
    Fallback,
}

/// A verdict plus how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedVerdict {
    #[serde(flatten)]
    pub verdict: Verdict,

    pub source: VerdictSource,

    /// Why the model output was not used, when it was not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl GeneratedVerdict {
    fn ai(verdict: Verdict) -> Self {
        Self {
            verdict,
            source: VerdictSource::Ai,
            fallback_reason: None,
        }
    }

    fn fallback(verdict: Verdict, reason: impl Into<String>) -> Self {
        Self {
            verdict,
            source: VerdictSource::Fallback,
            fallback_reason: Some(reason.into()),
        }
    }
}

/// Produces verdicts, preferring the provider when one is configured.
pub struct VerdictGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    completion: CompletionConfig,
    validator: ResponseValidator,
    selector: FallbackSelector,
}

impl std::fmt::Debug for VerdictGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictGenerator")
            .field("provider", &self.provider_name())
            .field("model", &self.completion.model)
            .field("timeout", &self.completion.timeout)
            .finish()
    }
}

impl VerdictGenerator {
    pub fn builder() -> VerdictGeneratorBuilder {
        VerdictGeneratorBuilder::new()
    }

    /// A generator that never calls out.
    pub fn offline() -> Self {
        VerdictGeneratorBuilder::new().build()
    }

    /// Name of the configured provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Whether a configured provider reports it can make calls. False when
    /// offline.
    pub async fn provider_ready(&self) -> bool {
        match self.provider.as_deref() {
            Some(provider) => provider.health_check().await,
            None => false,
        }
    }

    /// Generate a verdict.
    ///
    /// # Execution Flow
    /// 1. No provider: fallback
    /// 2. One provider call under `tokio::time::timeout`, bounded by the
    ///    provider's [`call_budget`](LlmProvider::call_budget)
    /// 3. Validate the completion against the request's decision type
    /// 4. Any failure along the way: fallback
    pub async fn generate(&self, request: &VerdictRequest) -> GeneratedVerdict {
        let decision_type = request.decision_type;

        let Some(provider) = self.provider.as_ref() else {
            tracing::debug!(decision_type = %decision_type, "No provider configured, skipping AI generation");
            return GeneratedVerdict::fallback(self.fallback(request), "no provider configured");
        };

        let messages = prompts::build_messages(decision_type, &request.free_text);
        let timeout = provider.call_budget(&self.completion);

        let completion =
            match tokio::time::timeout(timeout, provider.complete(messages, &self.completion)).await
            {
                Ok(Ok(completion)) => completion,
                Ok(Err(e)) => {
                    tracing::warn!(
                        provider = provider.name(),
                        decision_type = %decision_type,
                        error = %e,
                        "Provider call failed, using fallback"
                    );
                    return GeneratedVerdict::fallback(self.fallback(request), e.to_string());
                }
                Err(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        decision_type = %decision_type,
                        timeout = ?timeout,
                        "Provider call timed out, using fallback"
                    );
                    return GeneratedVerdict::fallback(
                        self.fallback(request),
                        format!("timed out after {:?}", timeout),
                    );
                }
            };

        match self.validator.validate(&completion.content, decision_type) {
            Ok(verdict) => {
                tracing::info!(
                    provider = provider.name(),
                    decision_type = %decision_type,
                    verdict = %verdict.verdict,
                    justification_chars = verdict.justification.chars().count(),
                    tokens = completion.usage.total(),
                    "AI verdict generated"
                );
                GeneratedVerdict::ai(verdict)
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    decision_type = %decision_type,
                    error = %e,
                    "AI response rejected, using fallback"
                );
                GeneratedVerdict::fallback(self.fallback(request), e.to_string())
            }
        }
    }

    /// The deterministic path on its own.
    pub fn fallback(&self, request: &VerdictRequest) -> Verdict {
        self.selector
            .select(request.decision_type, &request.free_text)
    }
}

/// Builder for [`VerdictGenerator`].
pub struct VerdictGeneratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    completion: CompletionConfig,
    validator: ResponseValidator,
}

impl VerdictGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            completion: CompletionConfig::default(),
            validator: ResponseValidator::default(),
        }
    }

    /// Set the provider. Without one the generator is fallback-only.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn validator(mut self, validator: ResponseValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn build(self) -> VerdictGenerator {
        VerdictGenerator {
            provider: self.provider,
            completion: self.completion,
            validator: self.validator,
            selector: FallbackSelector::new(),
        }
    }
}

impl Default for VerdictGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
