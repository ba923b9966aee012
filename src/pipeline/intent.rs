use serde::{Deserialize, Serialize};

/// Keywords that route a message to the diabetes risk questionnaire.
pub const RISK_KEYWORDS: &[&str] = &["diabetes", "risk"];

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RiskAssessment,
    Generic,
}

/// Classify a user message using case-insensitive keyword matching.
///
/// Plain substring search: no stemming and no negation handling, so
/// "I don't have diabetes" still routes to the questionnaire.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if RISK_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent::RiskAssessment;
    }

    Intent::Generic
}
