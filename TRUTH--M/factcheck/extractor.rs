use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{config::MAX_QUERIES, lexicon::Lexicon};

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%?").expect("number pattern compiles"));

/// Searchable features pulled out of a claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFeatures {
    /// Numbers and percentages in order of appearance.
    pub numbers: Vec<String>,
    /// Known entities: people, then places, then organizations.
    pub entities: Vec<String>,
}

/// Turns a free-text claim into a short list of web search queries.
#[derive(Debug, Clone)]
pub struct ClaimExtractor {
    lexicon: Arc<Lexicon>,
}

impl ClaimExtractor {
    /// Creates an extractor over the given lexicon.
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Collects numbers from the original text and entities from its lower-cased copy.
    #[must_use]
    pub fn features(&self, text: &str) -> ClaimFeatures {
        let lowered = text.trim().to_lowercase();
        let numbers = NUMBER_PATTERN
            .find_iter(text)
            .map(|found| found.as_str().to_string())
            .collect();
        let entities = self
            .lexicon
            .entity_groups()
            .into_iter()
            .flatten()
            .filter(|entity| lowered.contains(entity.as_str()))
            .cloned()
            .collect();
        ClaimFeatures { numbers, entities }
    }

    /// Builds up to five queries in priority order.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<String> {
        let ClaimFeatures { numbers, entities } = self.features(text);

        let mut queries = vec![prefix(text, 100)];
        if !numbers.is_empty() {
            for entity in entities.iter().take(2) {
                for number in numbers.iter().take(2) {
                    queries.push(format!("{entity} {number} fact check"));
                }
            }
        }
        for entity in entities.iter().take(3) {
            queries.push(format!("{entity} latest news facts"));
        }
        queries.push(format!("fact check {}", prefix(text, 50)));

        queries.truncate(MAX_QUERIES);
        queries
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new(Lexicon::shared())
    }
}

/// First `limit` characters, never splitting a code point.
pub(crate) fn prefix(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_query_is_the_leading_hundred_chars() {
        let text = "a".repeat(140);
        let queries = ClaimExtractor::default().extract(&text);
        assert_eq!(queries[0], "a".repeat(100));
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1], format!("fact check {}", "a".repeat(50)));
    }

    #[test]
    fn entities_follow_lexicon_order_case_insensitively() {
        let features = ClaimExtractor::default().features("Trump and Modi met in INDIA");
        assert_eq!(features.entities, vec!["trump", "modi", "india"]);
        assert!(features.numbers.is_empty());
    }

    #[test]
    fn numbers_keep_decimals_and_percent_signs() {
        let features = ClaimExtractor::default().features("GDP grew 7.5% in 2023, not 12");
        assert_eq!(features.numbers, vec!["7.5%", "2023", "12"]);
    }

    #[test]
    fn entity_number_pairs_take_priority_and_truncate_to_five() {
        let queries =
            ClaimExtractor::default().extract("Biden said China spends 40% of 2000 on NASA");
        assert_eq!(
            queries,
            vec![
                "Biden said China spends 40% of 2000 on NASA",
                "biden 40% fact check",
                "biden 2000 fact check",
                "china 40% fact check",
                "china 2000 fact check",
            ]
        );
    }

    #[test]
    fn entity_queries_appear_without_numbers() {
        let queries = ClaimExtractor::default().extract("Musk bought Google");
        assert_eq!(
            queries,
            vec![
                "Musk bought Google",
                "musk latest news facts",
                "google latest news facts",
                "fact check Musk bought Google",
            ]
        );
    }

    #[test]
    fn prefix_respects_multibyte_characters() {
        assert_eq!(prefix("héllo wörld", 4), "héll");
    }
}
