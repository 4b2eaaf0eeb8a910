use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const PEOPLE: &[&str] = &["trump", "biden", "modi", "putin", "musk", "gates"];
const PLACES: &[&str] = &["india", "china", "america", "russia", "ukraine", "israel"];
const ORGANIZATIONS: &[&str] = &["who", "fda", "cdc", "nasa", "google", "microsoft"];

const CREDIBLE_SOURCES: &[&str] = &[
    "reuters",
    "ap news",
    "bbc",
    "cnn",
    "nbc",
    "abc news",
    "washington post",
    "new york times",
    "wall street journal",
    "snopes",
    "politifact",
    "factcheck.org",
    "who",
    "cdc",
    "fda",
    "wikipedia",
    "britannica",
    "nature",
    "science",
];

const TOP_TIER_MARKERS: &[&str] = &["reuters", "bbc"];

const FACT_CHECK_INDICATORS: &[&str] = &[
    "fact check",
    "false",
    "true",
    "misleading",
    "incorrect",
    "accurate",
    "verified",
    "debunked",
    "confirmed",
    "disputed",
    "claim",
];

const NEGATIVE_STANCE: &[&str] = &["false", "incorrect", "misleading", "debunked"];
const POSITIVE_STANCE: &[&str] = &["true", "correct", "accurate", "confirmed", "verified"];

static DEFAULT_LEXICON: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::builtin()));

/// Fixed word lists driving entity detection, credibility, and stance.
///
/// Every entry is lower-case; matching is plain substring containment against
/// lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Well-known people.
    pub people: Vec<String>,
    /// Countries and regions.
    pub places: Vec<String>,
    /// Agencies and companies.
    pub organizations: Vec<String>,
    /// Publisher names treated as credible.
    pub credible_sources: Vec<String>,
    /// Publishers scored above other credible outlets.
    pub top_tier_markers: Vec<String>,
    /// Words signalling that a snippet talks about veracity at all.
    pub fact_check_indicators: Vec<String>,
    /// Words marking a contradicting snippet. Checked before positive words.
    pub negative_stance: Vec<String>,
    /// Words marking a supporting snippet.
    pub positive_stance: Vec<String>,
}

impl Lexicon {
    /// Shared handle to the built-in lexicon, created once per process.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&DEFAULT_LEXICON)
    }

    fn builtin() -> Self {
        Self {
            people: owned(PEOPLE),
            places: owned(PLACES),
            organizations: owned(ORGANIZATIONS),
            credible_sources: owned(CREDIBLE_SOURCES),
            top_tier_markers: owned(TOP_TIER_MARKERS),
            fact_check_indicators: owned(FACT_CHECK_INDICATORS),
            negative_stance: owned(NEGATIVE_STANCE),
            positive_stance: owned(POSITIVE_STANCE),
        }
    }

    /// Applies overrides on top of this lexicon; each present list replaces the original.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &LexiconOverrides) -> Self {
        let replace = |target: &mut Vec<String>, source: &Option<Vec<String>>| {
            if let Some(words) = source {
                *target = words
                    .iter()
                    .map(|word| word.trim().to_lowercase())
                    .filter(|word| !word.is_empty())
                    .collect();
            }
        };
        replace(&mut self.people, &overrides.people);
        replace(&mut self.places, &overrides.places);
        replace(&mut self.organizations, &overrides.organizations);
        replace(&mut self.credible_sources, &overrides.credible_sources);
        replace(&mut self.top_tier_markers, &overrides.top_tier_markers);
        replace(&mut self.fact_check_indicators, &overrides.fact_check_indicators);
        replace(&mut self.negative_stance, &overrides.negative_stance);
        replace(&mut self.positive_stance, &overrides.positive_stance);
        self
    }

    /// Entity lists in detection order: people, places, organizations.
    #[must_use]
    pub fn entity_groups(&self) -> [&[String]; 3] {
        [&self.people, &self.places, &self.organizations]
    }

    /// True when the lower-cased source names a credible outlet.
    #[must_use]
    pub fn is_credible(&self, source_lower: &str) -> bool {
        contains_any(source_lower, &self.credible_sources)
    }

    /// True when the lower-cased source names a top-tier outlet.
    #[must_use]
    pub fn is_top_tier(&self, source_lower: &str) -> bool {
        contains_any(source_lower, &self.top_tier_markers)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::shared().as_ref().clone()
    }
}

/// Optional replacements read from the `[lexicon]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconOverrides {
    /// Replacement people list.
    pub people: Option<Vec<String>>,
    /// Replacement places list.
    pub places: Option<Vec<String>>,
    /// Replacement organizations list.
    pub organizations: Option<Vec<String>>,
    /// Replacement credible source list.
    pub credible_sources: Option<Vec<String>>,
    /// Replacement top-tier markers.
    pub top_tier_markers: Option<Vec<String>>,
    /// Replacement fact-check indicators.
    pub fact_check_indicators: Option<Vec<String>>,
    /// Replacement negative stance words.
    pub negative_stance: Option<Vec<String>>,
    /// Replacement positive stance words.
    pub positive_stance: Option<Vec<String>>,
}

impl LexiconOverrides {
    /// True when no list is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Substring containment against any word in the list.
pub(crate) fn contains_any(haystack: &str, words: &[String]) -> bool {
    words.iter().any(|word| haystack.contains(word.as_str()))
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_lexicon_is_a_single_instance() {
        assert!(Arc::ptr_eq(&Lexicon::shared(), &Lexicon::shared()));
    }

    #[test]
    fn stance_lists_are_disjoint() {
        let lexicon = Lexicon::default();
        for word in &lexicon.negative_stance {
            assert!(!lexicon.positive_stance.contains(word));
        }
    }

    #[test]
    fn overrides_replace_and_lowercase() {
        let overrides = LexiconOverrides {
            people: Some(vec!["  Obama ".into(), String::new()]),
            ..LexiconOverrides::default()
        };
        let lexicon = Lexicon::default().with_overrides(&overrides);
        assert_eq!(lexicon.people, vec!["obama".to_string()]);
        assert_eq!(lexicon.places, Lexicon::default().places);
    }

    #[test]
    fn credibility_uses_substring_match() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_credible("reuters fact check"));
        assert!(lexicon.is_top_tier("bbc news"));
        assert!(!lexicon.is_credible("related information"));
    }
}
