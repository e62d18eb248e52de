//! Loading `LoggerConfig` from a hierarchical JSON configuration
//!
//! ```json
//! {
//!   "Logging": {
//!     "GlobalRollingInterval": "Hour",
//!     "GlobalRollingSizeKB": 2048,
//!     "Outputs": [
//!       { "Path": "logs/trace/", "MinLevel": "Trace", "MaxLevel": "Debug" },
//!       { "Path": "logs/", "MinLevel": "Information", "RollingInterval": "Day" }
//!     ],
//!     "LogLevel": { "Microsoft": "Warning" },
//!     "Console": { "Enabled": true, "Detailed": true },
//!     "RetentionDays": 7,
//!     "CleanupInterval": "01:00:00"
//!   }
//! }
//! ```
//!
//! Keys match case-insensitively. A value that fails to parse is skipped and
//! the previous value kept; only malformed JSON text is an error.

use super::output::OutputConfig;
use super::rotation::RotationInterval;
use super::settings::{LoggerConfig, DEFAULT_LOG_PATH};
use crate::core::error::Result;
use crate::core::log_level::LogLevel;
use crate::core::overflow_policy::OverflowPolicy;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

/// Section read when no name is given
pub const DEFAULT_SECTION: &str = "Logging";

/// Case-insensitive member lookup
fn member<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object
        .get(key)
        .or_else(|| object.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}

/// Resolve a `:`-separated section path such as `App:Logging`
fn section<'a>(root: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    path.split(':')
        .filter(|part| !part.is_empty())
        .try_fold(root, |value, part| member(value.as_object()?, part))?
        .as_object()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse<T: FromStr>(value: Option<&Value>) -> Option<T> {
    scalar_text(value?)?.parse().ok()
}

fn parse_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        other => match scalar_text(other)?.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
    }
}

/// Seconds as a number, or `hh:mm:ss` / `d.hh:mm:ss` text
pub fn parse_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        Value::String(s) => parse_duration_str(s),
        _ => None,
    }
}

fn parse_duration_str(text: &str) -> Option<Duration> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let (days, clock) = match text.split_once('.') {
        // A dot before the first colon separates days
        Some((days, rest)) if !days.contains(':') => (days.parse::<u64>().ok()?, rest),
        _ => (0, text),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let whole = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?;
    Duration::from_secs(whole).checked_add(Duration::try_from_secs_f64(seconds).ok()?)
}

fn merge_filters(target: &mut BTreeMap<String, LogLevel>, value: Option<&Value>) {
    let Some(object) = value.and_then(Value::as_object) else {
        return;
    };
    for (category, level) in object {
        if let Some(level) = parse::<LogLevel>(Some(level)) {
            target.insert(category.clone(), level);
        }
    }
}

fn parse_output(object: &Map<String, Value>) -> OutputConfig {
    let path = member(object, "Path")
        .and_then(scalar_text)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());
    let mut output = OutputConfig::new(path);

    if let Some(level) = parse(member(object, "MinLevel")) {
        output.min_level = level;
    }
    if let Some(level) = parse(member(object, "MaxLevel")) {
        output.max_level = Some(level);
    }
    if let Some(interval) = parse::<RotationInterval>(member(object, "RollingInterval")) {
        output.rolling_interval = Some(interval);
    }
    if let Some(size) = parse(member(object, "RollingSizeKB")) {
        output.rolling_size_kb = Some(size);
    }
    if let Some(flag) = parse_bool(member(object, "UseGlobalFilters")) {
        output.use_global_filters = flag;
    }
    merge_filters(&mut output.category_filters, member(object, "LogLevel"));

    output
}

fn apply_console(config: &mut LoggerConfig, object: &Map<String, Value>) {
    if let Some(flag) = parse_bool(member(object, "Enabled")) {
        config.console_enabled = flag;
    }
    if let Some(flag) = parse_bool(member(object, "Detailed")) {
        config.console_detailed = flag;
    }
    if let Some(flag) = parse_bool(member(object, "Colors")) {
        config.console_colors = flag;
    }
    if let Some(level) = parse(member(object, "MinLevel")) {
        config.console_min_level = level;
    }
    if let Some(flag) = parse_bool(member(object, "UseGlobalFilters")) {
        config.console_use_global_filters = flag;
    }
    merge_filters(&mut config.console_category_filters, member(object, "LogLevel"));
}

impl LoggerConfig {
    /// Apply `section` of `root` onto this configuration
    ///
    /// Scalars overwrite, outputs are appended and filter maps merged.
    /// A missing section leaves the configuration unchanged.
    pub fn apply_json_section(&mut self, root: &Value, section_path: &str) {
        let Some(object) = section(root, section_path) else {
            return;
        };

        if let Some(level) = parse(member(object, "MinimumLevel")) {
            self.minimum_level = level;
        }
        if let Some(interval) = parse(member(object, "GlobalRollingInterval")) {
            self.global_rolling_interval = interval;
        }
        if let Some(size) = parse(member(object, "GlobalRollingSizeKB")) {
            self.global_rolling_size_kb = size;
        }

        if let Some(outputs) = member(object, "Outputs").and_then(Value::as_array) {
            self.outputs
                .extend(outputs.iter().filter_map(Value::as_object).map(parse_output));
        }

        merge_filters(&mut self.category_filters, member(object, "LogLevel"));

        if let Some(console) = member(object, "Console").and_then(Value::as_object) {
            apply_console(self, console);
        }

        if let Some(days) = parse(member(object, "RetentionDays")) {
            self.retention_days = days;
        }
        if let Some(flag) = parse_bool(member(object, "BackgroundCleanup")) {
            self.background_cleanup_enabled = flag;
        }
        if let Some(interval) = member(object, "CleanupInterval").and_then(parse_duration) {
            if !interval.is_zero() {
                self.cleanup_interval = interval;
            }
        }
        if let Some(capacity) = parse::<usize>(member(object, "AsyncBuffer")) {
            self.async_buffer = (capacity > 0).then_some(capacity);
        }
        if let Some(policy) = parse::<OverflowPolicy>(member(object, "OverflowPolicy")) {
            self.overflow_policy = policy;
        }
    }

    /// Build a configuration from defaults plus `section` of `root`
    pub fn from_json_section(root: &Value, section_path: &str) -> Self {
        let mut config = Self::default();
        config.apply_json_section(root, section_path);
        config
    }

    /// Parse JSON text and apply `section` onto this configuration
    ///
    /// # Errors
    ///
    /// Returns `JsonError` if `json` is not valid JSON
    pub fn apply_json_str(&mut self, json: &str, section_path: &str) -> Result<()> {
        let root: Value = serde_json::from_str(json)?;
        self.apply_json_section(&root, section_path);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `JsonError` if `json` is not valid JSON
    pub fn from_json_str(json: &str, section_path: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_json_str(json, section_path)?;
        Ok(config)
    }
}
