#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON-line logging shared by the fact-check library and its service.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Log severity level, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Module emitting the log.
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary JSON payload for counts and identifiers.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Creates a record with the provided info.
    #[must_use]
    pub fn new(module: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.into(),
            level,
            message: message.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attaches a single metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Shared buffer filled by an in-memory logger.
pub type RecordBuffer = Arc<Mutex<Vec<LogRecord>>>;

enum LogSink {
    File { path: PathBuf, file: File },
    Stdout,
    Stderr,
    Memory(RecordBuffer),
}

/// Thread-safe JSON logger with append-only semantics.
pub struct JsonLogger {
    sink: Mutex<LogSink>,
    min_level: LogLevel,
}

impl std::fmt::Debug for JsonLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sink = match &*self.sink.lock() {
            LogSink::File { path, .. } => format!("file:{}", path.display()),
            LogSink::Stdout => "stdout".into(),
            LogSink::Stderr => "stderr".into(),
            LogSink::Memory(_) => "memory".into(),
        };
        f.debug_struct("JsonLogger")
            .field("sink", &sink)
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl JsonLogger {
    /// Creates or opens a logger appending to the desired path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self::with_sink(LogSink::File { path, file }))
    }

    /// Creates a logger writing JSON lines to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_sink(LogSink::Stdout)
    }

    /// Creates a logger writing JSON lines to stderr, keeping stdout free for command output.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_sink(LogSink::Stderr)
    }

    /// Creates a logger retaining records in memory, returning the shared buffer.
    #[must_use]
    pub fn memory() -> (Self, RecordBuffer) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        (Self::with_sink(LogSink::Memory(Arc::clone(&buffer))), buffer)
    }

    fn with_sink(sink: LogSink) -> Self {
        Self {
            sink: Mutex::new(sink),
            min_level: LogLevel::Debug,
        }
    }

    /// Drops records below the given level.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Writes a log record as a JSON line.
    pub fn log(&self, record: &LogRecord) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }
        let mut sink = self.sink.lock();
        match &mut *sink {
            LogSink::File { file, .. } => write_line(file, record)?,
            LogSink::Stdout => {
                let stdout = io::stdout();
                write_line(&mut stdout.lock(), record)?;
            }
            LogSink::Stderr => {
                let stderr = io::stderr();
                write_line(&mut stderr.lock(), record)?;
            }
            LogSink::Memory(buffer) => buffer.lock().push(record.clone()),
        }
        Ok(())
    }

    /// Returns the underlying file path when logging to a file.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        match &*self.sink.lock() {
            LogSink::File { path, .. } => Some(path.clone()),
            _ => None,
        }
    }
}

fn write_line(writer: &mut impl Write, record: &LogRecord) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
