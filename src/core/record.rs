//! Call-site view of a log call
//!
//! A `Record` borrows everything from the call site and is handed by
//! reference through the fan-out; each sink that accepts it formats the
//! message itself.

use super::log_level::LogLevel;
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Numeric identifier (plus optional name) of a logged event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EventId {
    pub id: i32,
    pub name: Option<&'static str>,
}

impl EventId {
    pub const fn new(id: i32) -> Self {
        Self { id, name: None }
    }

    pub const fn named(id: i32, name: &'static str) -> Self {
        Self { id, name: Some(name) }
    }

    /// `true` for the default id (0 with no name)
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.name.is_none()
    }
}

impl From<i32> for EventId {
    fn from(id: i32) -> Self {
        EventId::new(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{}:{}", self.id, name),
            None => write!(f, "{}", self.id),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Record<'a> {
    level: LogLevel,
    event_id: EventId,
    args: fmt::Arguments<'a>,
    error: Option<&'a (dyn Error + 'static)>,
    file: Option<&'static str>,
    line: Option<u32>,
}

impl<'a> Record<'a> {
    pub fn new(level: LogLevel, args: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            event_id: EventId::default(),
            args,
            error: None,
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn with_event_id(mut self, event_id: impl Into<EventId>) -> Self {
        self.event_id = event_id.into();
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn args(&self) -> fmt::Arguments<'a> {
        self.args
    }

    pub fn error(&self) -> Option<&'a (dyn Error + 'static)> {
        self.error
    }

    pub fn file(&self) -> Option<&'static str> {
        self.file
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("level", &self.level)
            .field("event_id", &self.event_id)
            .field("message", &self.args.to_string())
            .field("error", &self.error.map(|e| e.to_string()))
            .field("file", &self.file)
            .field("line", &self.line)
            .finish()
    }
}

/// Render an error and its `source()` chain, outermost first
pub fn error_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}
