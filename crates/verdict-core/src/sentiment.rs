//! Keyword sentiment used to bias the yes/no fallback.
//!
//! Matching is case-insensitive substring matching, so "hardly" counts
//! as "hard". Both patterns are compiled once.

use lazy_static::lazy_static;
use regex::Regex;

/// Words that suggest the situation is harmful or stressful.
pub const NEGATIVE_KEYWORDS: [&str; 16] = [
    "toxic", "harmful", "dangerous", "bad", "wrong", "hurt", "pain", "stress", "anxiety", "fear",
    "worry", "problem", "issue", "difficult", "hard", "struggle",
];

/// Words that suggest the situation is an opportunity.
pub const POSITIVE_KEYWORDS: [&str; 13] = [
    "good",
    "better",
    "best",
    "growth",
    "opportunity",
    "chance",
    "improve",
    "help",
    "support",
    "positive",
    "happy",
    "joy",
    "success",
];

lazy_static! {
    static ref NEGATIVE_PATTERN: Regex = keyword_pattern(&NEGATIVE_KEYWORDS);
    static ref POSITIVE_PATTERN: Regex = keyword_pattern(&POSITIVE_KEYWORDS);
}

fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{})", alternation)).unwrap()
}

/// Keyword presence in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sentiment {
    /// At least one negative keyword appears
    pub negative: bool,

    /// At least one positive keyword appears
    pub positive: bool,
}

impl Sentiment {
    /// Scan `input` for keywords.
    pub fn of(input: &str) -> Self {
        Self {
            negative: NEGATIVE_PATTERN.is_match(input),
            positive: POSITIVE_PATTERN.is_match(input),
        }
    }

    /// Negative keywords present and no positive ones.
    pub fn leans_negative(&self) -> bool {
        self.negative && !self.positive
    }
}
