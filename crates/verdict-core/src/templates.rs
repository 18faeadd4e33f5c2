//! Canned justifications for the deterministic path.
//!
//! One short declarative sentence each.

use crate::types::DecisionType;

/// Closing line shown under every rendered verdict.
pub const CLOSING_LINE: &str = "The decision is made. Move forward.";

/// Yes/no justifications.
pub const YES_NO: [&str; 6] = [
    "This decision is driven by emotion, not readiness.",
    "Delay reduces risk. Acting now increases it.",
    "You're reacting to boredom, not readiness.",
    "This is not the right moment.",
    "The outcome is predetermined by your hesitation.",
    "Delay increases certainty.",
];

/// This/that justifications.
pub const THIS_THAT: [&str; 6] = [
    "This option reduces complexity.",
    "That path minimizes future conflict.",
    "This choice eliminates more variables.",
    "That option requires less maintenance.",
    "This reduces decision fatigue.",
    "That path has fewer dependencies.",
];

/// Now/later justifications.
pub const NOW_LATER: [&str; 6] = [
    "This is not the right moment.",
    "Delay increases certainty.",
    "Acting now compounds existing errors.",
    "Waiting reduces variables.",
    "The timing is suboptimal.",
    "Later. Conditions will stabilize.",
];

/// Justifications for the negative-lean branch of yes/no decisions.
pub const NEGATIVE_LEAN: [&str; 4] = [
    "No. The risk outweighs the reward.",
    "Not now. The timing isn't right.",
    "This isn't the right move. Decline.",
    "Your hesitation is the answer. Say no.",
];

/// Justification list for a decision type.
pub fn justifications(decision_type: DecisionType) -> &'static [&'static str] {
    match decision_type {
        DecisionType::YesNo => &YES_NO,
        DecisionType::ThisThat => &THIS_THAT,
        DecisionType::NowLater => &NOW_LATER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_templates() {
        for decision_type in DecisionType::ALL {
            let list = justifications(decision_type);
            assert!(!list.is_empty());
            assert!(list.iter().all(|j| !j.trim().is_empty()));
        }
    }
}
