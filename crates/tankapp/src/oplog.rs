//! Operation log: one line per API call.
//!
//! This is the audit trail of what was asked of the tank, separate from the
//! diagnostic `log` output. Entries render as
//! `[YYYY-mm-dd HH:MM:SS] <operation> - <outcome>`.

use chrono::{DateTime, Local};
use log::warn;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
    Sweep,
    Noop,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Sweep => "sweep",
            Operation::Noop => "noop",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub operation: Operation,
    pub outcome: String,
}

impl LogEntry {
    pub fn now(operation: Operation, outcome: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            operation,
            outcome: outcome.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.outcome
        )
    }
}

/// Destination for operation log entries.
///
/// Recording is infallible from the caller's point of view: a sink that
/// cannot write reports it through `log` and drops the entry.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

impl<F> LogSink for F
where
    F: Fn(&LogEntry) + Send + Sync,
{
    fn record(&self, entry: &LogEntry) {
        self(entry)
    }
}

/// Appends entries to a file, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn record(&self, entry: &LogEntry) {
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", entry));
        if let Err(e) = written {
            warn!("cannot write operation log {}: {}", self.path.display(), e);
        }
    }
}
