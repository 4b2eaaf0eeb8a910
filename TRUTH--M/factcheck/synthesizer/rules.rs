use serde::{Deserialize, Serialize};

use crate::classifier::EvidenceTally;

/// Final verdict label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    /// Several credible contradictions.
    #[serde(rename = "FALSE")]
    False,
    /// Contradicted with no support.
    #[serde(rename = "LIKELY FALSE")]
    LikelyFalse,
    /// Several supporting results.
    #[serde(rename = "LIKELY TRUE")]
    LikelyTrue,
    /// Supported with no contradiction.
    #[serde(rename = "SUPPORTED")]
    Supported,
    /// Plenty of credible material without a clear stance.
    #[serde(rename = "MIXED EVIDENCE")]
    MixedEvidence,
    /// Some results, too few to judge.
    #[serde(rename = "INSUFFICIENT DATA")]
    InsufficientData,
    /// Nothing found.
    #[serde(rename = "UNVERIFIABLE")]
    Unverifiable,
    /// The analysis itself failed.
    #[serde(rename = "ERROR")]
    Error,
}

impl VerdictLabel {
    /// Wire name of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::False => "FALSE",
            Self::LikelyFalse => "LIKELY FALSE",
            Self::LikelyTrue => "LIKELY TRUE",
            Self::Supported => "SUPPORTED",
            Self::MixedEvidence => "MIXED EVIDENCE",
            Self::InsufficientData => "INSUFFICIENT DATA",
            Self::Unverifiable => "UNVERIFIABLE",
            Self::Error => "ERROR",
        }
    }

    /// Emoji shown next to the label.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::False | Self::Unverifiable | Self::Error => "❌",
            Self::LikelyFalse => "⚠️",
            Self::LikelyTrue | Self::Supported => "✅",
            Self::MixedEvidence | Self::InsufficientData => "❓",
        }
    }

    /// Display category.
    #[must_use]
    pub const fn category(self) -> DisplayCategory {
        match self {
            Self::False | Self::LikelyFalse | Self::Unverifiable | Self::Error => {
                DisplayCategory::Unreliable
            }
            Self::LikelyTrue | Self::Supported => DisplayCategory::Reliable,
            Self::MixedEvidence | Self::InsufficientData => DisplayCategory::Uncertain,
        }
    }

    /// Caveat shown with the verdict, if any.
    #[must_use]
    pub const fn warning(self) -> Option<&'static str> {
        match self {
            Self::False => Some("Multiple sources contradict this claim"),
            Self::LikelyFalse => Some("Credible sources dispute this claim"),
            Self::MixedEvidence => Some("Sources provide mixed information"),
            Self::InsufficientData => Some("Limited information available for verification"),
            Self::Unverifiable => Some("No reliable information found to verify this claim"),
            Self::LikelyTrue | Self::Supported | Self::Error => None,
        }
    }
}

impl std::fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse reliability bucket used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCategory {
    /// Claim looks sound.
    Reliable,
    /// Not enough signal either way.
    Uncertain,
    /// Claim looks wrong or could not be checked.
    Unreliable,
}

impl DisplayCategory {
    /// CSS class consumed by the front end.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Reliable => "result-reliable",
            Self::Uncertain => "result-suspicious",
            Self::Unreliable => "result-fake",
        }
    }
}

/// Label and confidence chosen by the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ruling {
    /// Chosen label.
    pub label: VerdictLabel,
    /// Confidence percentage, 0-100.
    pub confidence: u8,
}

/// Applies the verdict rules in priority order; the first match wins.
#[must_use]
pub fn decide(tally: EvidenceTally) -> Ruling {
    let EvidenceTally {
        supporting: s,
        contradicting: c,
        credible: k,
        total: t,
    } = tally;

    let (label, confidence) = if c >= 2 && k >= 1 {
        (VerdictLabel::False, capped(85 + 5 * c + 3 * k, 95))
    } else if c >= 1 && s == 0 && k >= 1 {
        (VerdictLabel::LikelyFalse, capped(75 + 8 * c + 2 * k, 88))
    } else if s >= 2 && k >= 1 {
        (VerdictLabel::LikelyTrue, capped(80 + 4 * s + 3 * k, 92))
    } else if s >= 1 && c == 0 && k >= 1 {
        (VerdictLabel::Supported, capped(70 + 6 * s + 4 * k, 85))
    } else if t >= 3 && k >= 2 {
        (VerdictLabel::MixedEvidence, capped(65 + 5 * k, 100))
    } else if t >= 1 {
        (VerdictLabel::InsufficientData, capped(55 + (3 * t).min(15), 100))
    } else {
        (VerdictLabel::Unverifiable, 45)
    };
    Ruling { label, confidence }
}

fn capped(value: usize, cap: u8) -> u8 {
    u8::try_from(value).map_or(cap, |value| value.min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(s: usize, c: usize, k: usize, t: usize) -> EvidenceTally {
        EvidenceTally {
            supporting: s,
            contradicting: c,
            credible: k,
            total: t,
        }
    }

    fn ruling(s: usize, c: usize, k: usize, t: usize) -> (VerdictLabel, u8) {
        let Ruling { label, confidence } = decide(tally(s, c, k, t));
        (label, confidence)
    }

    #[test]
    fn strong_contradiction_is_false_and_capped() {
        assert_eq!(ruling(0, 3, 2, 5), (VerdictLabel::False, 95));
        assert_eq!(ruling(1, 2, 1, 3), (VerdictLabel::False, 95));
    }

    #[test]
    fn single_contradiction_without_support_is_likely_false() {
        assert_eq!(ruling(0, 1, 1, 2), (VerdictLabel::LikelyFalse, 85));
        assert_eq!(ruling(0, 1, 3, 4), (VerdictLabel::LikelyFalse, 88));
    }

    #[test]
    fn support_rules_follow_contradiction_rules() {
        assert_eq!(ruling(2, 1, 1, 4), (VerdictLabel::LikelyTrue, 91));
        assert_eq!(ruling(3, 0, 2, 5), (VerdictLabel::LikelyTrue, 92));
        assert_eq!(ruling(1, 0, 1, 2), (VerdictLabel::Supported, 80));
        assert_eq!(ruling(1, 0, 3, 3), (VerdictLabel::Supported, 85));
    }

    #[test]
    fn mixed_evidence_needs_volume_and_credibility() {
        assert_eq!(ruling(1, 1, 2, 3), (VerdictLabel::MixedEvidence, 75));
        assert_eq!(ruling(0, 0, 9, 12), (VerdictLabel::MixedEvidence, 100));
    }

    #[test]
    fn sparse_evidence_degrades_gracefully() {
        assert_eq!(ruling(0, 0, 0, 1), (VerdictLabel::InsufficientData, 58));
        assert_eq!(ruling(2, 3, 0, 20), (VerdictLabel::InsufficientData, 70));
        assert_eq!(ruling(0, 0, 0, 0), (VerdictLabel::Unverifiable, 45));
    }

    #[test]
    fn decision_is_deterministic() {
        for (s, c, k, t) in [(0, 0, 0, 0), (1, 2, 3, 6), (4, 0, 1, 5)] {
            assert_eq!(ruling(s, c, k, t), ruling(s, c, k, t));
        }
    }

    #[test]
    fn labels_map_to_categories_and_warnings() {
        assert_eq!(VerdictLabel::Unverifiable.category(), DisplayCategory::Unreliable);
        assert_eq!(VerdictLabel::Supported.category().css_class(), "result-reliable");
        assert_eq!(VerdictLabel::InsufficientData.category().css_class(), "result-suspicious");
        assert!(VerdictLabel::LikelyTrue.warning().is_none());
        assert!(VerdictLabel::MixedEvidence.warning().is_some());
        assert_eq!(
            serde_json::to_string(&VerdictLabel::LikelyFalse).unwrap(),
            "\"LIKELY FALSE\""
        );
    }
}
