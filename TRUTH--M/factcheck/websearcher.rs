use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_logging::LogLevel;
use thiserror::Error;

use crate::{config::SearchSettings, extractor::prefix, telemetry::FactCheckTelemetry};

/// Which part of the instant-answer payload produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// The abstract block.
    Summary,
    /// One of the related topics.
    Related,
    /// The dictionary definition block.
    Definition,
}

/// Normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title of the hit.
    pub title: String,
    /// Text used for stance classification.
    pub snippet: String,
    /// Publisher name used for credibility.
    pub source: String,
    /// URL referencing the source.
    pub url: String,
    /// Payload section the hit came from.
    #[serde(rename = "type")]
    pub kind: ResultKind,
}

impl SearchResult {
    /// Creates a result.
    #[must_use]
    pub fn new(
        kind: ResultKind,
        title: impl Into<String>,
        snippet: impl Into<String>,
        source: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            source: source.into(),
            url: url.into(),
            kind,
        }
    }
}

/// Errors emitted while calling the search API.
#[derive(Debug, Error)]
pub enum WebSearchError {
    /// Connection, timeout, or client construction failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Provider answered with a non-success status.
    #[error("search failed with status {0}")]
    Status(StatusCode),
    /// Body was not a valid instant-answer document.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client that runs one query against an external provider.
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    /// Executes the search returning normalized results.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, WebSearchError>;
}

/// Instant-answer payload; only consumed fields are declared.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "Abstract")]
    abstract_body: String,
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "AbstractSource")]
    abstract_source: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
    #[serde(rename = "Definition")]
    definition: String,
    #[serde(rename = "DefinitionSource")]
    definition_source: String,
    #[serde(rename = "DefinitionURL")]
    definition_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Entry {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: Option<String>,
    },
    // Topic groups and anything else without a text field.
    #[allow(dead_code)]
    Other(Value),
}

impl InstantAnswer {
    fn into_results(self) -> Vec<SearchResult> {
        let mut results = Vec::new();
        if !self.abstract_body.is_empty() {
            results.push(SearchResult::new(
                ResultKind::Summary,
                or_fallback(self.abstract_text, "Summary"),
                self.abstract_body,
                or_fallback(self.abstract_source, "DuckDuckGo"),
                self.abstract_url,
            ));
        }
        for topic in self.related_topics.into_iter().take(3) {
            if let RelatedTopic::Entry { text, first_url } = topic {
                results.push(SearchResult::new(
                    ResultKind::Related,
                    prefix(&text, 100),
                    text,
                    "Related Information",
                    first_url.unwrap_or_default(),
                ));
            }
        }
        if !self.definition.is_empty() {
            results.push(SearchResult::new(
                ResultKind::Definition,
                "Definition",
                self.definition,
                or_fallback(self.definition_source, "Dictionary"),
                self.definition_url,
            ));
        }
        results
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Client for the DuckDuckGo-style instant-answer API.
#[derive(Debug, Clone)]
pub struct InstantAnswerClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl InstantAnswerClient {
    /// Builds a client from search settings.
    pub fn new(settings: &SearchSettings) -> Result<Self, WebSearchError> {
        let client = Client::builder().user_agent(&settings.user_agent).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
        })
    }
}

#[async_trait]
impl WebSearchClient for InstantAnswerClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, WebSearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebSearchError::Status(status));
        }
        let body = response.bytes().await?;
        let answer: InstantAnswer = serde_json::from_slice(&body)?;
        Ok(answer.into_results())
    }
}

/// In-process client with scripted answers, used offline and in tests.
#[derive(Debug, Default, Clone)]
pub struct LoopbackWebClient {
    answers: HashMap<String, Vec<SearchResult>>,
    failing: Vec<String>,
}

impl LoopbackWebClient {
    /// Scripts the results returned for a query.
    #[must_use]
    pub fn with_answer(mut self, query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        self.answers.insert(query.into(), results);
        self
    }

    /// Makes a query fail with a non-success status.
    #[must_use]
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failing.push(query.into());
        self
    }
}

#[async_trait]
impl WebSearchClient for LoopbackWebClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, WebSearchError> {
        if self.failing.iter().any(|failing| failing == query) {
            return Err(WebSearchError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.answers.get(query).cloned().unwrap_or_default())
    }
}

/// Runs extracted queries one after another and aggregates their results.
///
/// This is the fail-soft boundary: a failing query contributes no results and
/// never aborts the batch.
#[derive(Clone)]
pub struct WebSearcher {
    client: Arc<dyn WebSearchClient>,
    max_queries: usize,
    telemetry: Option<FactCheckTelemetry>,
}

impl std::fmt::Debug for WebSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearcher")
            .field("max_queries", &self.max_queries)
            .finish_non_exhaustive()
    }
}

impl WebSearcher {
    /// Creates a new web searcher.
    #[must_use]
    pub fn new(client: Arc<dyn WebSearchClient>) -> Self {
        Self {
            client,
            max_queries: crate::config::MAX_QUERIES,
            telemetry: None,
        }
    }

    /// Caps how many queries a batch runs.
    #[must_use]
    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries.max(1);
        self
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: FactCheckTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Upper bound on queries a batch runs.
    #[must_use]
    pub const fn max_queries(&self) -> usize {
        self.max_queries
    }

    /// Searches a single query; failures are logged and yield no results.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.client.search(query).await {
            Ok(results) => {
                self.log(
                    LogLevel::Debug,
                    "factcheck.search.query",
                    json!({ "query": query, "results": results.len() }),
                );
                results
            }
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "factcheck.search.error",
                    json!({ "query": query, "error": err.to_string() }),
                );
                Vec::new()
            }
        }
    }

    /// Searches queries sequentially, concatenating results in query order.
    pub async fn search_all(&self, queries: &[String]) -> Vec<SearchResult> {
        let mut aggregated = Vec::new();
        for query in queries.iter().take(self.max_queries) {
            aggregated.extend(self.search(query).await);
        }
        aggregated
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn settings(endpoint: String) -> SearchSettings {
        SearchSettings {
            endpoint,
            timeout_ms: 2_000,
            ..SearchSettings::default()
        }
    }

    fn full_answer() -> Value {
        json!({
            "Abstract": "The claim was debunked by researchers.",
            "AbstractText": "",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Claim",
            "RelatedTopics": [
                { "Text": "First related topic", "FirstURL": "https://duckduckgo.com/First" },
                { "Name": "Group", "Topics": [] },
                { "Text": "Second related topic", "FirstURL": "https://duckduckgo.com/Second" },
                { "Text": "Fourth entry is past the limit", "FirstURL": "https://duckduckgo.com/Late" }
            ],
            "Definition": "A statement asserted as true.",
            "DefinitionSource": "",
            "DefinitionURL": "https://dictionary.example/claim"
        })
    }

    #[tokio::test]
    async fn maps_instant_answer_sections_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "moon landing hoax"))
            .and(query_param("format", "json"))
            .and(query_param("no_html", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_answer()))
            .mount(&server)
            .await;

        let client = InstantAnswerClient::new(&settings(server.uri())).unwrap();
        let results = client.search("moon landing hoax").await.unwrap();

        let kinds: Vec<_> = results.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResultKind::Summary,
                ResultKind::Related,
                ResultKind::Related,
                ResultKind::Definition
            ]
        );
        assert_eq!(results[0].title, "Summary");
        assert_eq!(results[0].source, "Wikipedia");
        assert_eq!(results[1].source, "Related Information");
        assert_eq!(results[2].url, "https://duckduckgo.com/Second");
        assert_eq!(results[3].title, "Definition");
        assert_eq!(results[3].source, "Dictionary");
    }

    #[tokio::test]
    async fn related_topic_with_null_url_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "RelatedTopics": [
                    { "Text": "Topic without a link", "FirstURL": null },
                    { "Text": "Topic missing the key" }
                ]
            })))
            .mount(&server)
            .await;

        let client = InstantAnswerClient::new(&settings(server.uri())).unwrap();
        let results = client.search("unlinked").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].snippet, "Topic without a link");
        assert_eq!(results[0].url, "");
        assert_eq!(results[1].url, "");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_and_searcher_swallows_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = InstantAnswerClient::new(&settings(server.uri())).unwrap();
        assert!(matches!(
            client.search("anything").await,
            Err(WebSearchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
        let searcher = WebSearcher::new(Arc::new(client));
        assert!(searcher.search("anything").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_yields_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = InstantAnswerClient::new(&settings(server.uri())).unwrap();
        assert!(matches!(
            client.search("anything").await,
            Err(WebSearchError::Decode(_))
        ));
        let searcher = WebSearcher::new(Arc::new(client));
        assert!(searcher.search("anything").await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_no_results() {
        let client = InstantAnswerClient::new(&settings("http://127.0.0.1:9/".into())).unwrap();
        let (telemetry, records) = FactCheckTelemetry::memory("factcheck");
        let searcher = WebSearcher::new(Arc::new(client)).with_telemetry(telemetry);
        assert!(searcher.search("offline").await.is_empty());
        let records = records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[0].message, "factcheck.search.error");
    }

    #[tokio::test]
    async fn search_all_concatenates_in_query_order_and_skips_failures() {
        let hit = |title: &str| {
            SearchResult::new(ResultKind::Related, title, title, "Related Information", "")
        };
        let client = LoopbackWebClient::default()
            .with_answer("one", vec![hit("a"), hit("b")])
            .with_failure("two")
            .with_answer("three", vec![hit("c")]);
        let searcher = WebSearcher::new(Arc::new(client));
        let queries = vec!["one".to_string(), "two".into(), "three".into()];
        let titles: Vec<_> = searcher
            .search_all(&queries)
            .await
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn search_all_respects_query_budget() {
        let hit = SearchResult::new(ResultKind::Summary, "t", "s", "src", "");
        let client = LoopbackWebClient::default()
            .with_answer("one", vec![hit.clone()])
            .with_answer("two", vec![hit]);
        let searcher = WebSearcher::new(Arc::new(client)).with_max_queries(1);
        let queries = vec!["one".to_string(), "two".into()];
        assert_eq!(searcher.search_all(&queries).await.len(), 1);
    }
}
