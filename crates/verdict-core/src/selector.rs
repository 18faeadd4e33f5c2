//! Fallback selector: turns a description into a verdict without any model.
//!
//! The selector applies fixed rules:
//! 1. Hash the input by summing its UTF-16 code units
//! 2. For yes/no decisions whose text leans negative, a third of hashes
//!    land on `NO` with a negative-lean justification
//! 3. Otherwise index the allowed verdicts and the type's justification
//!    list by `hash mod len`
//!
//! Nothing here is configurable.

use crate::sentiment::Sentiment;
use crate::templates;
use crate::types::{DecisionType, Verdict};

/// Sum of the UTF-16 code units of `input`.
///
/// Characters outside the Basic Multilingual Plane contribute both
/// surrogate halves.
pub fn input_hash(input: &str) -> u64 {
    input.encode_utf16().map(u64::from).sum()
}

/// Deterministic verdict selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSelector;

impl FallbackSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select a verdict for `input`.
    ///
    /// Pure function: the same arguments always return the same verdict,
    /// and the verdict is always allowed for `decision_type`.
    pub fn select(&self, decision_type: DecisionType, input: &str) -> Verdict {
        let hash = input_hash(input);

        if decision_type == DecisionType::YesNo
            && hash % 3 == 0
            && Sentiment::of(input).leans_negative()
        {
            tracing::debug!(hash, "Negative lean applied to yes/no fallback");
            return Verdict::new("NO", pick(&templates::NEGATIVE_LEAN, hash));
        }

        let verdicts = decision_type.allowed_verdicts();
        Verdict::new(
            pick(verdicts, hash),
            pick(templates::justifications(decision_type), hash),
        )
    }
}

fn pick<'a>(items: &[&'a str], hash: u64) -> &'a str {
    // Lists are fixed and non-empty, so the modulus is never zero.
    items[(hash % items.len() as u64) as usize]
}
