//! # verdict-core
//!
//! Deterministic verdict selection for the Verdict service.
//!
//! This crate answers one question without touching the network:
//! given a decision type and a short description, what is the verdict?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same `(type, input)` always produces the same verdict
//! 2. **No I/O**: No HTTP, no clock, no randomness
//! 3. **Closed answers**: Every verdict is a member of its type's allowed set
//! 4. **Lenient types**: Unknown decision types resolve to `yes-no`
//!
//! It also holds the payment signature check, which is equally pure:
//! an HMAC over two identifiers compared against a client-supplied value.
//!
//! ## Example
//!
//! ```rust
//! use verdict_core::{select_fallback, DecisionType};
//!
//! let first = select_fallback(DecisionType::NowLater, "Should I switch jobs?");
//! let second = select_fallback(DecisionType::NowLater, "Should I switch jobs?");
//!
//! assert_eq!(first, second);
//! assert!(first.is_allowed_for(DecisionType::NowLater));
//! ```

pub mod selector;
pub mod sentiment;
pub mod signature;
pub mod templates;
pub mod types;

// Re-export main types at crate root
pub use selector::{input_hash, FallbackSelector};
pub use sentiment::Sentiment;
pub use signature::{PaymentConfirmation, SignatureVerifier};
pub use types::{DecisionType, Verdict, VerdictRequest, MAX_INPUT_CHARS};

use thiserror::Error;

/// Errors raised by core validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown decision type: {0}")]
    UnknownDecisionType(String),

    #[error("Signature error: {0}")]
    Signature(String),
}

/// Select a verdict without any external call.
///
/// This is the main entry point for the deterministic path and is
/// equivalent to `FallbackSelector::new().select(decision_type, input)`.
pub fn select_fallback(decision_type: DecisionType, input: &str) -> Verdict {
    FallbackSelector::new().select(decision_type, input)
}
