//! # verdict-runtime
//!
//! Network-facing half of Verdict.
//!
//! This crate makes the two kinds of external call the service needs:
//! - one text-generation request per verdict, with a deterministic fallback
//! - one order-creation request per payment
//!
//! ## Important
//!
//! Generation never fails from the caller's point of view. Missing
//! credentials, transport errors, timeouts and malformed model output all
//! end in [`verdict_core::FallbackSelector`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdict_core::{DecisionType, VerdictRequest};
//! use verdict_runtime::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_yaml_file("verdict.yaml")?;
//! let generator = config.build_generator();
//!
//! let request = VerdictRequest::new(DecisionType::YesNo, "Should I quit?")?;
//! let generated = generator.generate(&request).await;
//! println!("{} - {}", generated.verdict.verdict, generated.verdict.justification);
//! ```

pub mod config;
pub mod generator;
pub mod payment;
pub mod prompts;
pub mod providers;
pub mod validation;

pub use config::{ConfigError, LlmSettings, PaymentSettings, RuntimeConfig};
pub use generator::{GeneratedVerdict, VerdictGenerator, VerdictGeneratorBuilder, VerdictSource};
pub use payment::{Order, OrderRequest, PaymentError, PaymentGateway, RazorpayGateway};
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderRegistry, Role, TokenUsage,
};
pub use validation::{ResponseValidator, ValidationError};
