//! High-level orchestration for the claim-to-verdict pipeline.

use std::{sync::Arc, time::Instant};

use serde_json::{json, Value};
use shared_logging::LogLevel;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    classifier::EvidenceClassifier,
    config::GuardianConfig,
    extractor::ClaimExtractor,
    lexicon::Lexicon,
    synthesizer::{Verdict, VerdictSynthesizer},
    telemetry::FactCheckTelemetry,
    websearcher::{InstantAnswerClient, WebSearchClient, WebSearcher},
};

/// Errors surfaced to the request boundary.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Claim text missing or empty.
    #[error("No text provided")]
    EmptyClaim,
    /// Anything else that stopped the pipeline.
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// Runtime wiring extractor, searcher, classifier, and synthesizer.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct FactCheckRuntime {
    extractor: ClaimExtractor,
    searcher: WebSearcher,
    classifier: EvidenceClassifier,
    synthesizer: VerdictSynthesizer,
    telemetry: Option<FactCheckTelemetry>,
}

impl FactCheckRuntime {
    /// Bootstraps the runtime with a custom search client.
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>, client: Arc<dyn WebSearchClient>) -> Self {
        Self {
            extractor: ClaimExtractor::new(Arc::clone(&lexicon)),
            searcher: WebSearcher::new(client),
            classifier: EvidenceClassifier::new(Arc::clone(&lexicon)),
            synthesizer: VerdictSynthesizer::new(lexicon),
            telemetry: None,
        }
    }

    /// Bootstraps the live runtime: instant-answer client, configured lexicon and logging.
    pub fn from_config(config: &GuardianConfig) -> anyhow::Result<Self> {
        let client = InstantAnswerClient::new(&config.search)?;
        let telemetry = FactCheckTelemetry::from_settings(&config.logging)?;
        Ok(Self::new(config.lexicon(), Arc::new(client))
            .with_telemetry(telemetry)
            .with_max_queries(config.search.max_queries))
    }

    /// Caps how many extracted queries are searched per claim.
    #[must_use]
    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.searcher = self.searcher.with_max_queries(max_queries);
        self
    }

    /// Attaches telemetry sinks to the runtime and its searcher.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: FactCheckTelemetry) -> Self {
        self.searcher = self.searcher.with_telemetry(telemetry.clone());
        self.telemetry = Some(telemetry);
        self
    }

    /// Runs extract, search, classify, and synthesize for one claim.
    pub async fn analyze(&self, text: &str) -> Result<Verdict, AnalysisError> {
        if text.is_empty() {
            return Err(AnalysisError::EmptyClaim);
        }
        let started = Instant::now();
        let analysis_id = Uuid::new_v4();
        self.log(
            LogLevel::Info,
            "factcheck.analyze.start",
            json!({ "analysis_id": analysis_id, "chars": text.chars().count() }),
        );

        let mut queries = self.extractor.extract(text);
        queries.truncate(self.searcher.max_queries());
        self.log(
            LogLevel::Debug,
            "factcheck.extract",
            json!({ "analysis_id": analysis_id, "queries": queries }),
        );

        let results = self.searcher.search_all(&queries).await;
        let evidence = self.classifier.classify(text, &results);
        let tally = evidence.tally();
        self.log(
            LogLevel::Debug,
            "factcheck.classify",
            json!({
                "analysis_id": analysis_id,
                "results": tally.total,
                "supporting": tally.supporting,
                "contradicting": tally.contradicting,
                "credible": tally.credible,
            }),
        );

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut verdict = self
            .synthesizer
            .synthesize(text, &evidence, &results, elapsed_ms);
        verdict.algorithm_details.record_queries(&queries);

        self.log(
            LogLevel::Info,
            "factcheck.analyze.complete",
            json!({
                "analysis_id": analysis_id,
                "label": verdict.label,
                "confidence": verdict.confidence,
                "elapsed_ms": elapsed_ms,
            }),
        );
        Ok(verdict)
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}
