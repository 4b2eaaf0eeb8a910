use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    lexicon::{contains_any, Lexicon},
    websearcher::SearchResult,
};

/// Stance of a single result toward the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// Snippet uses confirming language.
    Supporting,
    /// Snippet uses refuting language.
    Contradicting,
    /// No usable stance signal.
    Neutral,
}

/// Results bucketed by stance, plus the independent credible-source bucket.
///
/// Every input lands in exactly one stance bucket; `credible` may repeat any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSet {
    /// Results with confirming language.
    pub supporting: Vec<SearchResult>,
    /// Results with refuting language.
    pub contradicting: Vec<SearchResult>,
    /// Everything else.
    pub neutral: Vec<SearchResult>,
    /// Results published by credible outlets.
    pub credible: Vec<SearchResult>,
    /// Number of classified results, duplicates included.
    pub total_count: usize,
}

impl EvidenceSet {
    /// Evidence counts driving the verdict rules.
    #[must_use]
    pub fn tally(&self) -> EvidenceTally {
        EvidenceTally {
            supporting: self.supporting.len(),
            contradicting: self.contradicting.len(),
            credible: self.credible.len(),
            total: self.total_count,
        }
    }
}

/// Bucket sizes of an [`EvidenceSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceTally {
    /// Supporting results (`s`).
    pub supporting: usize,
    /// Contradicting results (`c`).
    pub contradicting: usize,
    /// Credible results (`k`).
    pub credible: usize,
    /// All results (`t`).
    pub total: usize,
}

/// Keyword classifier for stance and credibility.
#[derive(Debug, Clone)]
pub struct EvidenceClassifier {
    lexicon: Arc<Lexicon>,
}

impl EvidenceClassifier {
    /// Creates a classifier over the given lexicon.
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// True when the result's publisher is on the credible list.
    #[must_use]
    pub fn is_credible(&self, result: &SearchResult) -> bool {
        self.lexicon.is_credible(&result.source.to_lowercase())
    }

    /// Stance from fact-check language in snippet and title, then stance words in the snippet.
    #[must_use]
    pub fn stance(&self, result: &SearchResult) -> Stance {
        let snippet = result.snippet.to_lowercase();
        let title = result.title.to_lowercase();
        let combined = format!("{snippet}{title}");
        if !contains_any(&combined, &self.lexicon.fact_check_indicators) {
            return Stance::Neutral;
        }
        if contains_any(&snippet, &self.lexicon.negative_stance) {
            Stance::Contradicting
        } else if contains_any(&snippet, &self.lexicon.positive_stance) {
            Stance::Supporting
        } else {
            Stance::Neutral
        }
    }

    /// Buckets every result, preserving input order within each bucket.
    #[must_use]
    pub fn classify(&self, _original_text: &str, results: &[SearchResult]) -> EvidenceSet {
        let mut evidence = EvidenceSet {
            total_count: results.len(),
            ..EvidenceSet::default()
        };
        for result in results {
            if self.is_credible(result) {
                evidence.credible.push(result.clone());
            }
            let bucket = match self.stance(result) {
                Stance::Supporting => &mut evidence.supporting,
                Stance::Contradicting => &mut evidence.contradicting,
                Stance::Neutral => &mut evidence.neutral,
            };
            bucket.push(result.clone());
        }
        evidence
    }
}

impl Default for EvidenceClassifier {
    fn default() -> Self {
        Self::new(Lexicon::shared())
    }
}
