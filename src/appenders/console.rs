//! Console appender implementation

use crate::core::{Appender, LogEntry, LogLevel, Result, TimestampFormat};

/// Writes entries to stdout, or stderr for `Error` and above
///
/// Plain lines are `timestamp [LVL] message`; detailed lines add the
/// category: `timestamp [LVL] [category] message`.
pub struct ConsoleAppender {
    detailed: bool,
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            detailed: false,
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        let tag = format!("[{}]", entry.level.short_name());
        let tag = if self.use_colors {
            entry.level.colorize(&tag).to_string()
        } else {
            tag
        };

        let timestamp = self.timestamp_format.format(&entry.timestamp);
        let mut line = if self.detailed {
            format!("{} {} [{}] {}", timestamp, tag, entry.category, entry.message)
        } else {
            format!("{} {} {}", timestamp, tag, entry.message)
        };
        entry.write_details(&mut line);

        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        // Route Error and Critical levels to stderr, others to stdout
        match entry.level {
            LogLevel::Error | LogLevel::Critical => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
