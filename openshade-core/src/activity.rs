//! Append-only operator log.
//!
//! Every user-visible outcome (preset loaded, tweak failed, cache cleared) lands
//! here. Entries are mirrored to the `log` facade so the file logger keeps a copy.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    /// `HH:MM:SS - Severity: message`
    pub fn display_line(&self) -> String {
        format!(
            "{} - {}: {}",
            self.time.format("%H:%M:%S"),
            self.severity.label(),
            self.message
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Success | Severity::Info => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
        self.entries.push(LogEntry {
            time: Local::now(),
            severity,
            message,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    /// Entries appended after `mark`, used by the CLI to print what one command produced
    pub fn since(&self, mark: usize) -> &[LogEntry] {
        &self.entries[mark.min(self.entries.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_severity_and_message() {
        let mut log = ActivityLog::new();
        log.success("Shader cache cleared");
        log.warn("Missing entry 'IsActive' for tweak [X]");
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(Severity::Warning), 1);
        assert_eq!(log.last().map(|e| e.severity), Some(Severity::Warning));
    }

    #[test]
    fn display_line_includes_label() {
        let mut log = ActivityLog::new();
        log.error("Could not clear shader cache.");
        let line = log.entries()[0].display_line();
        assert!(line.ends_with(" - Error: Could not clear shader cache."));
    }

    #[test]
    fn since_clamps_out_of_range_mark() {
        let mut log = ActivityLog::new();
        log.info("a");
        log.info("b");
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(10).is_empty());
    }
}
