use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::lexicon::{Lexicon, LexiconOverrides};

/// Hard upper bound on queries derived from one claim.
pub const MAX_QUERIES: usize = 5;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuardianConfig {
    /// External search settings.
    pub search: SearchSettings,
    /// Inbound listener settings.
    pub server: ServerSettings,
    /// Log sink settings.
    pub logging: LoggingSettings,
    /// Optional replacements for the built-in word lists.
    pub lexicon: LexiconOverrides,
}

impl GuardianConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading guardian config {}", path.display()))?;
        let mut config = Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(log_path) = &config.logging.path {
            if log_path.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                config.logging.path = Some(base.join(log_path));
            }
        }
        Ok(config)
    }

    /// Loads from the path when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parses and validates a TOML document.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.search.endpoint.trim().is_empty() {
            bail!("search endpoint cannot be empty");
        }
        if self.search.timeout_ms == 0 {
            bail!("search timeout must be positive");
        }
        if !(1..=MAX_QUERIES).contains(&self.search.max_queries) {
            bail!(
                "max_queries {} outside 1..={}",
                self.search.max_queries,
                MAX_QUERIES
            );
        }
        if self.server.body_limit_kb == 0 {
            bail!("body_limit_kb must be positive");
        }
        Ok(())
    }

    /// Builds the lexicon, sharing the built-in one when nothing is overridden.
    #[must_use]
    pub fn lexicon(&self) -> Arc<Lexicon> {
        if self.lexicon.is_empty() {
            Lexicon::shared()
        } else {
            Arc::new(Lexicon::default().with_overrides(&self.lexicon))
        }
    }
}

/// Settings for the instant-answer search API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the instant-answer endpoint.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// User agent sent with each request.
    pub user_agent: String,
    /// Number of extracted queries actually searched.
    pub max_queries: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.duckduckgo.com/".into(),
            timeout_ms: 10_000,
            user_agent: "truth-guardian/0.1".into(),
            max_queries: MAX_QUERIES,
        }
    }
}

/// Settings for the HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum accepted request body.
    pub body_limit_kb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            body_limit_kb: 64,
        }
    }
}

impl ServerSettings {
    /// `host:port` listen address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Console stream used when no log file is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// Where structured logs go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// JSON-lines log file; `stream` is used when absent.
    pub path: Option<PathBuf>,
    /// Console stream for file-less logging.
    pub stream: LogStream,
    /// Module name stamped on every record.
    pub module: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            path: None,
            stream: LogStream::Stdout,
            module: "factcheck".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GuardianConfig::parse("").unwrap();
        assert_eq!(config.search.timeout_ms, 10_000);
        assert_eq!(config.search.max_queries, 5);
        assert_eq!(config.server.listen_addr(), "127.0.0.1:5000");
        assert!(Arc::ptr_eq(&config.lexicon(), &Lexicon::shared()));
    }

    #[test]
    fn rejects_out_of_range_query_budget() {
        let err = GuardianConfig::parse("[search]\nmax_queries = 9\n").unwrap_err();
        assert!(err.to_string().contains("max_queries"));
        assert!(GuardianConfig::parse("[search]\ntimeout_ms = 0\n").is_err());
    }

    #[test]
    fn loads_file_with_overrides_and_relative_log_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("guardian.toml");
        fs::write(
            &path,
            r#"
[search]
endpoint = "http://127.0.0.1:9999/"
timeout_ms = 2500

[server]
port = 8080

[logging]
path = "logs/factcheck.log"
stream = "stderr"

[lexicon]
credible_sources = ["Reuters", "AP News"]
"#,
        )
        .unwrap();
        let config = GuardianConfig::load(&path).unwrap();
        assert_eq!(config.search.endpoint, "http://127.0.0.1:9999/");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.logging.path.as_deref(),
            Some(dir.path().join("logs/factcheck.log").as_path())
        );
        assert_eq!(config.logging.stream, LogStream::Stderr);
        let lexicon = config.lexicon();
        assert_eq!(lexicon.credible_sources, vec!["reuters", "ap news"]);
        assert_eq!(lexicon.people, Lexicon::default().people);
    }
}
