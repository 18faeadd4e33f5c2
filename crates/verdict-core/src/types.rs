//! Request and verdict types shared by every crate in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Maximum length of the free-text description, in characters.
pub const MAX_INPUT_CHARS: usize = 200;

/// The kind of decision the user wants settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionType {
    /// A binary YES / NO answer
    #[default]
    YesNo,

    /// A pick between two options, THIS or THAT
    ThisThat,

    /// A timing call, NOW or LATER
    NowLater,
}

impl DecisionType {
    /// Every decision type, in display order.
    pub const ALL: [DecisionType; 3] = [
        DecisionType::YesNo,
        DecisionType::ThisThat,
        DecisionType::NowLater,
    ];

    /// Wire name (`yes-no`, `this-that`, `now-later`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::YesNo => "yes-no",
            DecisionType::ThisThat => "this-that",
            DecisionType::NowLater => "now-later",
        }
    }

    /// Parse a wire name, resolving anything unrecognised to `yes-no`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// The closed set of verdicts this type may produce.
    pub fn allowed_verdicts(&self) -> &'static [&'static str; 2] {
        match self {
            DecisionType::YesNo => &["YES", "NO"],
            DecisionType::ThisThat => &["THIS", "THAT"],
            DecisionType::NowLater => &["NOW", "LATER"],
        }
    }

    /// Check whether `verdict` belongs to this type's allowed set.
    pub fn allows(&self, verdict: &str) -> bool {
        self.allowed_verdicts().iter().any(|allowed| *allowed == verdict)
    }

    /// Button label used on the selection page.
    pub fn label(&self) -> &'static str {
        match self {
            DecisionType::YesNo => "YES / NO",
            DecisionType::ThisThat => "THIS or THAT",
            DecisionType::NowLater => "NOW or LATER",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes-no" => Ok(DecisionType::YesNo),
            "this-that" => Ok(DecisionType::ThisThat),
            "now-later" => Ok(DecisionType::NowLater),
            other => Err(CoreError::UnknownDecisionType(other.to_string())),
        }
    }
}

/// A single verdict request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictRequest {
    /// What kind of answer is wanted
    pub decision_type: DecisionType,

    /// The user's description of the situation
    pub free_text: String,
}

impl VerdictRequest {
    /// Create a validated request.
    ///
    /// Rejects blank text and text longer than [`MAX_INPUT_CHARS`].
    pub fn new(decision_type: DecisionType, free_text: impl Into<String>) -> Result<Self, CoreError> {
        let free_text = free_text.into();

        if free_text.trim().is_empty() {
            return Err(CoreError::InvalidRequest(
                "free text must not be empty".to_string(),
            ));
        }

        let length = free_text.chars().count();
        if length > MAX_INPUT_CHARS {
            return Err(CoreError::InvalidRequest(format!(
                "free text is {} characters, limit is {}",
                length, MAX_INPUT_CHARS
            )));
        }

        Ok(Self {
            decision_type,
            free_text,
        })
    }

    /// Cut the text to [`MAX_INPUT_CHARS`], then validate.
    ///
    /// Only blank text is rejected. Used where the user has already paid and
    /// a long description should still get an answer.
    pub fn clamped(decision_type: DecisionType, free_text: &str) -> Result<Self, CoreError> {
        Self::new(
            decision_type,
            free_text.chars().take(MAX_INPUT_CHARS).collect::<String>(),
        )
    }

    /// Create a request without validation.
    ///
    /// The fallback path accepts anything, including empty text.
    pub fn lenient(decision_type: DecisionType, free_text: impl Into<String>) -> Self {
        Self {
            decision_type,
            free_text: free_text.into(),
        }
    }
}

/// A categorical answer with its justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The short answer, e.g. `YES` or `LATER`
    pub verdict: String,

    /// One or two sentences backing the answer
    pub justification: String,
}

impl Verdict {
    pub fn new(verdict: impl Into<String>, justification: impl Into<String>) -> Self {
        Self {
            verdict: verdict.into(),
            justification: justification.into(),
        }
    }

    /// Whether the verdict is a member of the allowed set for `decision_type`.
    pub fn is_allowed_for(&self, decision_type: DecisionType) -> bool {
        decision_type.allows(&self.verdict)
    }
}
