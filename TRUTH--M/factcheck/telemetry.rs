use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, RecordBuffer};

use crate::config::{LogStream, LoggingSettings};

/// Builder configuring telemetry for the fact-check pipeline.
pub struct FactCheckTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    stream: LogStream,
    min_level: LogLevel,
}

impl FactCheckTelemetryBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            stream: LogStream::Stdout,
            min_level: LogLevel::Debug,
        }
    }

    /// Sets the JSON log path; the console stream is used otherwise.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Selects the console stream for file-less logging.
    #[must_use]
    pub const fn stream(mut self, stream: LogStream) -> Self {
        self.stream = stream;
        self
    }

    /// Drops records below the given level.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<FactCheckTelemetry> {
        let logger = match self.log_path {
            Some(path) => JsonLogger::new(path)?,
            None => match self.stream {
                LogStream::Stdout => JsonLogger::stdout(),
                LogStream::Stderr => JsonLogger::stderr(),
            },
        };
        Ok(FactCheckTelemetry::from_logger(
            self.module,
            logger.min_level(self.min_level),
        ))
    }
}

/// Telemetry handle shared by the pipeline stages.
#[derive(Clone)]
pub struct FactCheckTelemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    module: String,
    logger: JsonLogger,
}

impl fmt::Debug for FactCheckTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactCheckTelemetry")
            .field("module", &self.inner.module)
            .finish()
    }
}

impl FactCheckTelemetry {
    fn from_logger(module: impl Into<String>, logger: JsonLogger) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                module: module.into(),
                logger,
            }),
        }
    }

    /// Returns a builder for this telemetry helper.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> FactCheckTelemetryBuilder {
        FactCheckTelemetryBuilder::new(module)
    }

    /// Builds telemetry from the `[logging]` config section.
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self> {
        let mut builder = Self::builder(&settings.module).stream(settings.stream);
        if let Some(path) = &settings.path {
            builder = builder.log_path(path);
        }
        builder.build()
    }

    /// Telemetry retaining records in memory.
    #[must_use]
    pub fn memory(module: impl Into<String>) -> (Self, RecordBuffer) {
        let (logger, buffer) = JsonLogger::memory();
        (Self::from_logger(module, logger), buffer)
    }

    /// Logs a structured record.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        let mut record = LogRecord::new(&self.inner.module, level, message);
        if let Value::Object(fields) = metadata {
            record.metadata = fields;
        }
        self.inner.logger.log(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_to_configured_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("factcheck.log");
        let telemetry = FactCheckTelemetry::from_settings(&LoggingSettings {
            path: Some(log_path.clone()),
            stream: LogStream::Stderr,
            module: "factcheck".into(),
        })
        .unwrap();
        telemetry
            .log(
                LogLevel::Info,
                "factcheck.test",
                json!({ "claim": "sample" }),
            )
            .unwrap();
        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("factcheck.test"));
        assert!(content.contains("\"claim\":\"sample\""));
    }

    #[test]
    fn builder_level_filter_applies() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("warn.log");
        let telemetry = FactCheckTelemetry::builder("factcheck")
            .log_path(&log_path)
            .min_level(LogLevel::Warn)
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Debug, "factcheck.noise", Value::Null)
            .unwrap();
        telemetry
            .log(LogLevel::Warn, "factcheck.search.error", Value::Null)
            .unwrap();
        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("factcheck.noise"));
        assert!(content.contains("factcheck.search.error"));
    }
}
