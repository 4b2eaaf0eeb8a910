#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Heuristic claim checking: extract queries, search the web, classify snippets, synthesize a verdict.

/// Fixed lookup lists shared by extractor, classifier, and synthesizer.
pub mod lexicon;

/// TOML configuration for search, server, logging, and lexicon overrides.
pub mod config;

/// Claim-to-query extraction.
#[path = "../extractor.rs"]
pub mod extractor;

/// External web search client and fail-soft searcher.
#[path = "../websearcher.rs"]
pub mod websearcher;

/// Stance and credibility classification.
#[path = "../classifier.rs"]
pub mod classifier;

/// Verdict synthesis.
#[path = "../synthesizer/main.rs"]
pub mod synthesizer;

/// Telemetry helpers.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// High-level orchestration entry point.
#[path = "../main.rs"]
pub mod orchestration_entry;

pub use classifier::{EvidenceClassifier, EvidenceSet, EvidenceTally, Stance};
pub use config::{GuardianConfig, LogStream};
pub use extractor::{ClaimExtractor, ClaimFeatures};
pub use lexicon::{Lexicon, LexiconOverrides};
pub use orchestration_entry::{AnalysisError, FactCheckRuntime};
pub use synthesizer::{
    DisplayCategory, DisplaySource, PatternAnalysis, Verdict, VerdictLabel, VerdictSynthesizer,
};
pub use telemetry::{FactCheckTelemetry, FactCheckTelemetryBuilder};
pub use websearcher::{
    InstantAnswerClient, LoopbackWebClient, ResultKind, SearchResult, WebSearchClient,
    WebSearchError, WebSearcher,
};
