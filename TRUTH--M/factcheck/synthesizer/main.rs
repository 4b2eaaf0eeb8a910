//! Verdict synthesis: decision table, text patterns, and the output record.

/// Text statistics, red flags, and credibility indicators.
pub mod patterns;
/// Prioritised verdict rules.
pub mod rules;
/// Verdict record and synthesizer.
pub mod verdict;

pub use patterns::{LinguisticAnalysis, PatternAnalysis};
pub use rules::{decide, DisplayCategory, Ruling, VerdictLabel};
pub use verdict::{AlgorithmTrace, DisplaySource, Verdict, VerdictSynthesizer};
