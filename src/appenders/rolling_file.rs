//! Rolling file appender
//!
//! Files are named `{prefix}{yyyy-MM-dd-HH}_{seq:03}.log`. The stamp is the
//! local start of the current rolling period; the sequence advances whenever
//! the current file reaches the size limit and restarts when a new period
//! begins.

use crate::config::rotation::RotationInterval;
use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use crate::core::timestamp::TimestampFormat;
use chrono::{DateTime, Local, NaiveDateTime};
#[cfg(unix)]
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Highest sequence number tried within one period
const MAX_SEQUENCE: u32 = 999;

const STAMP_FORMAT: &str = "%Y-%m-%d-%H";

/// Render one entry as a file line (including the trailing newline)
///
/// `2025-01-08 18:30:45.123 [INF] [app::db:42] connected {request=7}`
pub fn format_line(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut line = format!(
        "{} [{}] [{}:{}] {}",
        timestamp_format.format(&entry.timestamp),
        entry.level.short_name(),
        entry.category,
        entry.line.unwrap_or(0),
        entry.message
    );
    entry.write_details(&mut line);

    line.push('\n');
    line
}

/// File appender rolling on period change and size limit
///
/// # Examples
///
/// ```no_run
/// use rust_logger_composite::appenders::RollingFileAppender;
/// use rust_logger_composite::config::RotationInterval;
///
/// // logs/info/2025-01-08-18_000.log, rolling hourly or at 2 MB
/// let appender = RollingFileAppender::new("logs/info/", RotationInterval::Hour, 2048).unwrap();
/// ```
pub struct RollingFileAppender {
    prefix: String,
    interval: RotationInterval,
    /// Size limit in bytes, 0 = unlimited
    size_limit: u64,
    writer: Option<BufWriter<File>>,
    current_path: PathBuf,
    current_size: u64,
    period: Option<NaiveDateTime>,
    stamp: String,
    sequence: u32,
    timestamp_format: TimestampFormat,
}

impl RollingFileAppender {
    /// Create the target directory and open the file for the current period
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file cannot be opened
    pub fn new(prefix: impl Into<String>, interval: RotationInterval, size_limit_kb: u64) -> Result<Self> {
        let prefix = prefix.into();

        let directory = if prefix.ends_with('/') || prefix.ends_with('\\') {
            Some(Path::new(&prefix))
        } else {
            Path::new(&prefix).parent()
        };
        if let Some(directory) = directory.filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(directory).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", directory.display()),
                    e,
                )
            })?;
        }

        let mut appender = Self {
            prefix,
            interval,
            size_limit: size_limit_kb.saturating_mul(1024),
            writer: None,
            current_path: PathBuf::new(),
            current_size: 0,
            period: None,
            stamp: String::new(),
            sequence: 0,
            timestamp_format: TimestampFormat::default(),
        };
        appender.start_period(&Local::now())?;
        Ok(appender)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn file_path(&self, stamp: &str, sequence: u32) -> PathBuf {
        PathBuf::from(format!("{}{}_{:03}.log", self.prefix, stamp, sequence))
    }

    /// First sequence at or after `start` whose file is missing or below the limit
    fn free_sequence(&self, stamp: &str, start: u32) -> u32 {
        (start..=MAX_SEQUENCE)
            .find(|&seq| match fs::metadata(self.file_path(stamp, seq)) {
                Ok(meta) => self.size_limit == 0 || meta.len() < self.size_limit,
                Err(_) => true,
            })
            .unwrap_or(MAX_SEQUENCE)
    }

    fn start_period(&mut self, now: &DateTime<Local>) -> Result<()> {
        self.period = self.interval.period_start(now);
        self.stamp = match self.period {
            Some(start) => start.format(STAMP_FORMAT).to_string(),
            None => now.format(STAMP_FORMAT).to_string(),
        };
        let sequence = self.free_sequence(&self.stamp, 0);
        self.open(sequence)
    }

    fn open(&mut self, sequence: u32) -> Result<()> {
        self.close()?;

        let path = self.file_path(&self.stamp, sequence);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        // Retention cleanup skips files it cannot lock exclusively. A Windows
        // shared lock would also block our own writes, so it is unix only.
        #[cfg(unix)]
        if let Err(e) = FileExt::try_lock_shared(&file) {
            eprintln!("[LOGGER WARNING] Could not lock {}: {}", path.display(), e);
        }

        self.current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        self.writer = Some(BufWriter::new(file));
        self.current_path = path;
        self.sequence = sequence;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.current_path.display().to_string(),
                    format!("Failed to flush before rolling: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn roll_if_needed(&mut self, at: &DateTime<Local>) -> Result<()> {
        if self.interval != RotationInterval::Infinite && self.interval.period_start(at) != self.period {
            return self.start_period(at);
        }

        if self.size_limit > 0 && self.current_size >= self.size_limit && self.sequence < MAX_SEQUENCE {
            let next = self.free_sequence(&self.stamp, self.sequence + 1);
            return self.open(next);
        }

        Ok(())
    }

    /// File currently written to
    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub fn interval(&self) -> RotationInterval {
        self.interval
    }
}

impl Appender for RollingFileAppender {
    fn name(&self) -> &str {
        "RollingFileAppender"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let at = entry.timestamp.with_timezone(&Local);
        if let Err(e) = self.roll_if_needed(&at) {
            eprintln!("[LOGGER WARNING] Log rolling failed: {}. Continuing with current file.", e);
            if self.writer.is_none() {
                return Err(e);
            }
        }

        let line = format_line(entry, &self.timestamp_format);
        match self.writer.as_mut() {
            Some(writer) => {
                writer.write_all(line.as_bytes()).map_err(|e| {
                    LoggerError::file_appender(
                        self.current_path.display().to_string(),
                        format!("Failed to write log entry: {}", e),
                    )
                })?;
                self.current_size += line.len() as u64;
                Ok(())
            }
            None => Err(LoggerError::writer("Writer not initialized")),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.current_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RollingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
