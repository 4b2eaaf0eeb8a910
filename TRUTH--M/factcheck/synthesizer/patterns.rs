use serde::{Deserialize, Serialize};

use crate::classifier::EvidenceTally;

/// Surface statistics of the claim text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticAnalysis {
    /// Count of `!`.
    pub exclamation_marks: usize,
    /// Uppercase characters as a percentage of all characters, one decimal.
    pub caps_ratio: f64,
    /// Whitespace-delimited tokens.
    pub word_count: usize,
    /// Exclamations and contradictions folded into a 0-100 score.
    pub sensationalism_score: usize,
}

impl LinguisticAnalysis {
    /// Measures `text`; `contradicting` raises the sensationalism score.
    #[must_use]
    pub fn measure(text: &str, contradicting: usize) -> Self {
        let exclamation_marks = text.matches('!').count();
        let total_chars = text.chars().count();
        let caps_ratio = if total_chars == 0 {
            0.0
        } else {
            let upper = text.chars().filter(|c| c.is_uppercase()).count();
            round_one_decimal(upper as f64 / total_chars as f64 * 100.0)
        };
        Self {
            exclamation_marks,
            caps_ratio,
            word_count: text.split_whitespace().count(),
            sensationalism_score: (exclamation_marks * 10 + contradicting * 15).min(100),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Red flags, credibility indicators, and text statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// Reasons to doubt the claim.
    pub red_flags: Vec<String>,
    /// Reasons to trust the claim.
    pub credibility_indicators: Vec<String>,
    /// Text statistics.
    pub linguistic_analysis: LinguisticAnalysis,
    /// Reserved; always empty.
    pub risk_factors: Vec<String>,
}

impl PatternAnalysis {
    /// Builds the pattern record for a claim and its evidence tally.
    #[must_use]
    pub fn analyze(text: &str, tally: EvidenceTally) -> Self {
        let mut red_flags = Vec::new();
        let mut credibility_indicators = Vec::new();
        if tally.contradicting >= 1 {
            red_flags.push(format!(
                "{} sources contradict this claim",
                tally.contradicting
            ));
        }
        if tally.credible == 0 {
            red_flags.push("No credible sources found".to_string());
        }
        if tally.supporting >= 1 {
            credibility_indicators.push(format!("{} sources support this claim", tally.supporting));
        }
        if tally.credible >= 1 {
            credibility_indicators.push(format!("{} credible sources referenced", tally.credible));
        }
        Self {
            red_flags,
            credibility_indicators,
            linguistic_analysis: LinguisticAnalysis::measure(text, tally.contradicting),
            risk_factors: Vec::new(),
        }
    }

    /// Pattern record attached to an error verdict.
    #[must_use]
    pub fn system_error() -> Self {
        Self {
            red_flags: vec!["System error".to_string()],
            ..Self::default()
        }
    }
}
