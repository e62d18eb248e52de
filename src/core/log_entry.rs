//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::record::{error_chain, EventId, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::sync::Arc;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Owned, formatted log record as handed to appenders
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub category: Arc<str>,
    #[serde(skip_serializing_if = "EventId::is_empty")]
    pub event_id: EventId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<LogContext>,
    /// Attached error followed by its source chain
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub error_chain: Vec<String>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, category: impl Into<Arc<str>>, message: String) -> Self {
        Self {
            level,
            category: category.into(),
            event_id: EventId::default(),
            message: Self::sanitize_message(&message),
            timestamp: Utc::now(),
            file: None,
            line: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            scopes: Vec::new(),
            error_chain: Vec::new(),
        }
    }

    /// Materialize a borrowed record for `category`
    pub fn from_record(category: Arc<str>, record: &Record<'_>) -> Self {
        let mut entry = Self::new(record.level(), category, record.args().to_string());
        entry.event_id = record.event_id();
        entry.file = record.file().map(String::from);
        entry.line = record.line();
        if let Some(error) = record.error() {
            entry.error_chain = error_chain(error);
        }
        entry
    }

    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<LogContext>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Append active scopes as ` {k=v ...}` and the error chain as
    /// indented `Exception:` / `Caused by:` lines
    pub fn write_details(&self, line: &mut String) {
        for scope in self.scopes.iter().filter(|scope| !scope.is_empty()) {
            line.push_str(" {");
            line.push_str(&scope.format_fields());
            line.push('}');
        }

        let mut chain = self.error_chain.iter();
        if let Some(error) = chain.next() {
            line.push_str("\n  Exception: ");
            line.push_str(error);
            for cause in chain {
                line.push_str("\n  Caused by: ");
                line.push_str(cause);
            }
        }
    }

    /// Thread name if set, otherwise the thread id
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "app", "line one\nline two\tend".to_string());
        assert_eq!(entry.message, "line one\\nline two\\tend");
    }

    #[test]
    fn test_from_record_copies_call_site() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing");
        let entry = LogEntry::from_record(
            Arc::from("app::config"),
            &Record::new(LogLevel::Error, format_args!("load failed"))
                .with_event_id(42)
                .with_error(&err)
                .with_location("src/config.rs", 88),
        );

        assert_eq!(&*entry.category, "app::config");
        assert_eq!(entry.event_id.id, 42);
        assert_eq!(entry.message, "load failed");
        assert_eq!(entry.line, Some(88));
        assert_eq!(entry.error_chain, vec!["config.json missing".to_string()]);
    }

    #[test]
    fn test_write_details() {
        let mut entry = LogEntry::new(LogLevel::Error, "app", "failed".to_string())
            .with_scopes(vec![LogContext::new(), LogContext::new().with_field("job", 3)]);
        entry.error_chain = vec!["outer".to_string(), "inner".to_string()];

        let mut line = String::from("failed");
        entry.write_details(&mut line);
        assert_eq!(line, "failed {job=3}\n  Exception: outer\n  Caused by: inner");
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let entry = LogEntry::new(LogLevel::Warn, "app", "hello".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"message\":\"hello\""));
        assert!(!json.contains("scopes"));
        assert!(!json.contains("error_chain"));
    }
}
