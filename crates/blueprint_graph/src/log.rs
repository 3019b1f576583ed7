// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run log sinks.
//!
//! Behaviors and the run coordinator report user-facing messages through a
//! [`LogSink`]. This is separate from the crate's own `tracing` diagnostics.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Severity of a run log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogSeverity {
    /// Plain information
    Info,
    /// Something the user should look at
    Warning,
    /// Output produced by the graph itself
    Success,
    /// A failure
    Error,
    /// Messages from the engine about the run
    System,
}

impl LogSeverity {
    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
            Self::System => "system",
        }
    }
}

/// One-way destination for run log lines
pub trait LogSink: Send + Sync {
    /// Record a message
    fn log(&self, message: &str, severity: LogSeverity);
}

/// Forwards run log lines to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn log(&self, message: &str, severity: LogSeverity) {
        match severity {
            LogSeverity::Error => tracing::error!(target: "blueprint::run", "{message}"),
            LogSeverity::Warning => tracing::warn!(target: "blueprint::run", "{message}"),
            LogSeverity::Info | LogSeverity::Success | LogSeverity::System => {
                tracing::info!(target: "blueprint::run", severity = severity.name(), "{message}");
            }
        }
    }
}

/// A captured log line
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity
    pub severity: LogSeverity,
    /// Message text
    pub message: String,
    /// When the line was recorded
    pub timestamp: SystemTime,
}

impl LogEntry {
    /// Timestamp formatted as `HH:MM:SS.mmm` (UTC)
    pub fn time_label(&self) -> String {
        let duration = self
            .timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        let secs = duration.as_secs();
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60,
            duration.subsec_millis()
        )
    }
}

/// Buffers log lines in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages of a given severity, in order
    pub fn messages(&self, severity: LogSeverity) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was logged
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl LogSink for MemoryLog {
    fn log(&self, message: &str, severity: LogSeverity) {
        self.entries.lock().push(LogEntry {
            severity,
            message: message.to_string(),
            timestamp: SystemTime::now(),
        });
    }
}

/// Sends every line to two sinks
pub struct Tee<A, B>(pub A, pub B);

impl<A: LogSink, B: LogSink> LogSink for Tee<A, B> {
    fn log(&self, message: &str, severity: LogSeverity) {
        self.0.log(message, severity);
        self.1.log(message, severity);
    }
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn log(&self, message: &str, severity: LogSeverity) {
        (**self).log(message, severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_memory_log_keeps_order() {
        let log = MemoryLog::new();
        log.log("one", LogSeverity::System);
        log.log("two", LogSeverity::Success);
        log.log("three", LogSeverity::Success);

        assert_eq!(log.len(), 3);
        assert_eq!(log.messages(LogSeverity::Success), vec!["two", "three"]);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_tee_writes_both() {
        let a = Arc::new(MemoryLog::new());
        let b = Arc::new(MemoryLog::new());
        let tee = Tee(a.clone(), b.clone());
        tee.log("hi", LogSeverity::Info);
        assert_eq!(a.len(), 1);
        assert_eq!(b.messages(LogSeverity::Info), vec!["hi"]);
    }

    #[test]
    fn test_time_label() {
        let entry = LogEntry {
            severity: LogSeverity::Info,
            message: String::new(),
            timestamp: SystemTime::UNIX_EPOCH + Duration::from_millis(3_723_045),
        };
        assert_eq!(entry.time_label(), "01:02:03.045");
    }
}
