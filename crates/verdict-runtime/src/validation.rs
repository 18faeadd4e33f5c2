//! Acceptance rules for model output.
//!
//! Model text is untrusted. Anything that does not yield a well-formed,
//! allowed verdict is rejected and the caller falls back to the
//! deterministic selector. There is no repair step beyond trimming an
//! overlong justification.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;
use thiserror::Error;
use verdict_core::{DecisionType, Verdict};

/// Default floor on the trimmed response length.
pub const DEFAULT_MIN_RESPONSE_CHARS: usize = 50;

/// Justifications shorter than this are rejected.
pub const MIN_JUSTIFICATION_CHARS: usize = 20;

/// Justifications longer than this are cut down.
pub const MAX_JUSTIFICATION_CHARS: usize = 200;

lazy_static! {
    /// First `{` through last `}` around a verdict/justification pair.
    static ref VERDICT_OBJECT: Regex =
        Regex::new(r#"(?s)\{.*"verdict".*"justification".*\}"#).unwrap();
}

/// Why a model response was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Response too short: {length} characters, need more than {min}")]
    TooShort { length: usize, min: usize },

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Verdict '{verdict}' is not allowed for {decision_type}")]
    VerdictNotAllowed {
        verdict: String,
        decision_type: DecisionType,
    },

    #[error("Justification too short: {0} characters")]
    JustificationTooShort(usize),
}

/// Checks a raw completion against the acceptance rules.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    min_response_chars: usize,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self {
            min_response_chars: DEFAULT_MIN_RESPONSE_CHARS,
        }
    }
}

impl ResponseValidator {
    pub fn new(min_response_chars: usize) -> Self {
        Self { min_response_chars }
    }

    pub fn min_response_chars(&self) -> usize {
        self.min_response_chars
    }

    /// Validate a completion for `decision_type`.
    ///
    /// # Rules
    /// 1. Trimmed content must be longer than `min_response_chars`
    /// 2. The verdict object is extracted from surrounding prose if present
    /// 3. `verdict` and `justification` must be non-empty strings
    /// 4. The verdict must be in the type's allowed set
    /// 5. The justification must be at least 20 characters
    /// 6. A justification over 200 characters is cut to its first sentence
    pub fn validate(
        &self,
        raw: &str,
        decision_type: DecisionType,
    ) -> Result<Verdict, ValidationError> {
        let content = raw.trim();
        let length = content.chars().count();
        if length <= self.min_response_chars {
            return Err(ValidationError::TooShort {
                length,
                min: self.min_response_chars,
            });
        }

        let json_text = VERDICT_OBJECT
            .find(content)
            .map(|m| m.as_str())
            .unwrap_or(content);

        let parsed: JsonValue = serde_json::from_str(json_text)
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        let verdict = non_empty_str(&parsed, "verdict")?;
        let justification = non_empty_str(&parsed, "justification")?;

        if !decision_type.allows(verdict) {
            return Err(ValidationError::VerdictNotAllowed {
                verdict: verdict.to_string(),
                decision_type,
            });
        }

        let justification_chars = justification.chars().count();
        if justification_chars < MIN_JUSTIFICATION_CHARS {
            return Err(ValidationError::JustificationTooShort(justification_chars));
        }

        Ok(Verdict::new(verdict, shorten_justification(justification)))
    }
}

fn non_empty_str<'a>(value: &'a JsonValue, field: &'static str) -> Result<&'a str, ValidationError> {
    value[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// Cut an overlong justification to its first sentence.
///
/// When the text starts with a period the first sentence is empty, and the
/// first 200 characters are kept instead.
pub fn shorten_justification(justification: &str) -> String {
    if justification.chars().count() <= MAX_JUSTIFICATION_CHARS {
        return justification.to_string();
    }

    match justification.split('.').next() {
        Some(first) if !first.is_empty() => format!("{}.", first),
        _ => justification.chars().take(MAX_JUSTIFICATION_CHARS).collect(),
    }
}
