use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    patterns::PatternAnalysis,
    rules::{decide, Ruling, VerdictLabel},
};
use crate::{
    classifier::EvidenceSet, extractor::prefix, lexicon::Lexicon, websearcher::SearchResult,
};

const CONTENT_TYPE: &str = "Web-Verified Claim";
const METHODOLOGY: &str = "Real-time web search + Multi-source analysis + Evidence contradiction detection + Credible source verification";
const ALGORITHM_FEATURES: &[&str] = &[
    "Real-time web search integration",
    "Multi-source evidence analysis",
    "Credible source identification",
    "Fact-check pattern recognition",
    "Evidence contradiction detection",
    "Dynamic confidence scoring",
];
const MAX_DISPLAY_SOURCES: usize = 5;
const BACKFILL_THRESHOLD: usize = 2;
const BACKFILL_WINDOW: usize = 3;

/// Source entry shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySource {
    /// Publisher name.
    pub name: String,
    /// Title, at most 100 characters.
    pub title: String,
    /// Link, `#` when unknown.
    pub url: String,
    /// 85 top-tier, 75 credible, 60 backfilled.
    pub credibility_score: u8,
}

/// Descriptive trace of each pipeline stage. Not used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmTrace {
    /// Claim extraction.
    pub step_1: String,
    /// Web search.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step_2: String,
    /// Source analysis.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step_3: String,
    /// Evidence assessment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step_4: String,
    /// Final verdict.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step_5: String,
    /// Fixed feature list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub algorithm_features: Vec<String>,
    /// Queries issued for this claim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_queries: Vec<String>,
}

impl AlgorithmTrace {
    /// Records the extracted queries on the trace.
    pub fn record_queries(&mut self, queries: &[String]) {
        self.step_1 = format!(
            "Claim Extraction: Identified {} key searchable phrases from input text",
            queries.len()
        );
        self.search_queries = queries.to_vec();
    }
}

/// Final labeled, scored output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Verdict label.
    pub label: VerdictLabel,
    /// Confidence percentage.
    pub confidence: u8,
    /// Kind of content analysed.
    pub content_type: String,
    /// Label emoji.
    pub emoji: String,
    /// Display category as a CSS class.
    pub color_class: String,
    /// Caveat, if any.
    pub warning: Option<String>,
    /// At most five sources for display.
    pub sources: Vec<DisplaySource>,
    /// One-line evidence summary.
    pub source_summary: String,
    /// Red flags and text statistics.
    pub pattern_analysis: PatternAnalysis,
    /// Stage-by-stage trace.
    pub algorithm_details: AlgorithmTrace,
    /// Elapsed time formatted as `{ms}ms`.
    pub processing_time: String,
    /// Elapsed time in milliseconds.
    pub processing_time_ms: u64,
    /// Fixed methodology description.
    pub methodology: String,
}

impl Verdict {
    /// Fixed-shape verdict reporting a failed analysis.
    #[must_use]
    pub fn error(message: &str) -> Self {
        let label = VerdictLabel::Error;
        Self {
            label,
            confidence: 0,
            content_type: "System Error".into(),
            emoji: label.emoji().into(),
            color_class: label.category().css_class().into(),
            warning: None,
            sources: Vec::new(),
            source_summary: format!("Error occurred during analysis: {message}"),
            pattern_analysis: PatternAnalysis::system_error(),
            algorithm_details: AlgorithmTrace {
                step_1: format!("Error: {message}"),
                ..AlgorithmTrace::default()
            },
            processing_time: "0ms".into(),
            processing_time_ms: 0,
            methodology: "Error handling".into(),
        }
    }
}

/// Turns classified evidence into a verdict.
#[derive(Debug, Clone)]
pub struct VerdictSynthesizer {
    lexicon: Arc<Lexicon>,
}

impl VerdictSynthesizer {
    /// Creates a synthesizer over the given lexicon.
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Builds the verdict. Pure: same inputs, same output.
    #[must_use]
    pub fn synthesize(
        &self,
        original_text: &str,
        evidence: &EvidenceSet,
        raw_results: &[SearchResult],
        elapsed_ms: u64,
    ) -> Verdict {
        let tally = evidence.tally();
        let Ruling { label, confidence } = decide(tally);

        let algorithm_details = AlgorithmTrace {
            step_1: "Claim Extraction: Identified key searchable phrases from input text".into(),
            step_2: format!(
                "Web Search: Retrieved {} results across multiple sources",
                raw_results.len()
            ),
            step_3: format!(
                "Source Analysis: Found {} credible sources among results",
                tally.credible
            ),
            step_4: format!(
                "Evidence Assessment: {} supporting vs {} contradicting evidence",
                tally.supporting, tally.contradicting
            ),
            step_5: format!(
                "Final Verdict: {confidence}% confidence based on web evidence analysis"
            ),
            algorithm_features: ALGORITHM_FEATURES.iter().map(|f| (*f).to_string()).collect(),
            search_queries: Vec::new(),
        };

        Verdict {
            label,
            confidence,
            content_type: CONTENT_TYPE.into(),
            emoji: label.emoji().into(),
            color_class: label.category().css_class().into(),
            warning: label.warning().map(str::to_string),
            sources: self.display_sources(evidence, raw_results),
            source_summary: format!(
                "Analyzed {} web sources: {} supporting, {} contradicting, {} from credible outlets",
                tally.total, tally.supporting, tally.contradicting, tally.credible
            ),
            pattern_analysis: PatternAnalysis::analyze(original_text, tally),
            algorithm_details,
            processing_time: format!("{elapsed_ms}ms"),
            processing_time_ms: elapsed_ms,
            methodology: METHODOLOGY.into(),
        }
    }

    /// Credible results first; thin lists are backfilled from the leading raw results.
    #[must_use]
    pub fn display_sources(
        &self,
        evidence: &EvidenceSet,
        raw_results: &[SearchResult],
    ) -> Vec<DisplaySource> {
        let mut sources: Vec<DisplaySource> = evidence
            .credible
            .iter()
            .take(MAX_DISPLAY_SOURCES)
            .map(|result| {
                let score = if self.lexicon.is_top_tier(&result.source.to_lowercase()) {
                    85
                } else {
                    75
                };
                display(result, "Unknown Source", "No title", score)
            })
            .collect();

        if sources.len() < BACKFILL_THRESHOLD {
            sources.extend(
                raw_results
                    .iter()
                    .take(BACKFILL_WINDOW)
                    .filter(|result| !evidence.credible.contains(result))
                    .map(|result| display(result, "Web Source", "Search Result", 60)),
            );
        }
        sources
    }
}

impl Default for VerdictSynthesizer {
    fn default() -> Self {
        Self::new(Lexicon::shared())
    }
}

fn display(result: &SearchResult, name: &str, title: &str, score: u8) -> DisplaySource {
    let pick = |value: &str, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };
    DisplaySource {
        name: pick(&result.source, name),
        title: prefix(&pick(&result.title, title), 100),
        url: pick(&result.url, "#"),
        credibility_score: score,
    }
}
