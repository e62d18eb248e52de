//! Per-sink level range and category rules
//!
//! A record reaches a sink only if its level lies inside the sink's range
//! AND satisfies the category rule selected for its category. The selected
//! rule is the one whose category is the longest case-insensitive prefix of
//! the record's category; among equally long matches the rule added last
//! wins. Sinks add global rules before their own, so a sink rule overrides a
//! global rule for the same category.

use crate::config::output::OutputConfig;
use crate::config::settings::LoggerConfig;
use crate::core::log_level::LogLevel;
use std::collections::BTreeMap;

/// Inclusive level interval, unbounded above when `max` is `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: LogLevel,
    pub max: Option<LogLevel>,
}

impl LevelRange {
    pub const ALL: LevelRange = LevelRange {
        min: LogLevel::Trace,
        max: None,
    };

    pub fn new(min: LogLevel, max: Option<LogLevel>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: LogLevel) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.min && self.max.map_or(true, |max| level <= max)
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// Minimum level for categories starting with `category`
///
/// `Default`, `*` and the empty string match every category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: String,
    pub min_level: LogLevel,
}

impl CategoryRule {
    pub fn new(category: impl Into<String>, min_level: LogLevel) -> Self {
        Self {
            category: category.into(),
            min_level,
        }
    }

    fn prefix(&self) -> &str {
        let category = self.category.trim();
        if category.eq_ignore_ascii_case("default") || category == "*" {
            ""
        } else {
            category
        }
    }

    /// Length of the matched prefix, or `None` if the rule does not apply
    pub fn match_len(&self, category: &str) -> Option<usize> {
        let prefix = self.prefix();
        category
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| prefix.len())
    }
}

/// Filter of one sink: level range plus ordered category rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkFilter {
    range: LevelRange,
    rules: Vec<CategoryRule>,
}

impl SinkFilter {
    pub fn new(range: LevelRange) -> Self {
        Self {
            range,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, category: impl Into<String>, min_level: LogLevel) -> Self {
        self.rules.push(CategoryRule::new(category, min_level));
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: &BTreeMap<String, LogLevel>) -> Self {
        self.rules
            .extend(rules.iter().map(|(category, level)| CategoryRule::new(category.clone(), *level)));
        self
    }

    /// Range `[min_level, max_level]`, global rules (if enabled) then the output's own
    pub fn for_output(output: &OutputConfig, global: &LoggerConfig) -> Self {
        let filter = Self::new(LevelRange::new(output.min_level, output.max_level));
        let filter = if output.use_global_filters {
            filter.with_rules(&global.category_filters)
        } else {
            filter
        };
        filter.with_rules(&output.category_filters)
    }

    /// Range `[console_min_level, ∞)`, global rules (if enabled) then console rules
    pub fn for_console(global: &LoggerConfig) -> Self {
        let filter = Self::new(LevelRange::at_least(global.console_min_level));
        let filter = if global.console_use_global_filters {
            filter.with_rules(&global.category_filters)
        } else {
            filter
        };
        filter.with_rules(&global.console_category_filters)
    }

    pub fn range(&self) -> LevelRange {
        self.range
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Minimum level imposed on `category`, if any rule matches
    pub fn category_min(&self, category: &str) -> Option<LogLevel> {
        let mut best: Option<(usize, LogLevel)> = None;
        for rule in &self.rules {
            if let Some(len) = rule.match_len(category) {
                if best.map_or(true, |(best_len, _)| len >= best_len) {
                    best = Some((len, rule.min_level));
                }
            }
        }
        best.map(|(_, level)| level)
    }

    /// Filter specialized for one category
    pub fn resolve(&self, category: &str) -> CategoryFilter {
        CategoryFilter {
            range: self.range,
            category_min: self.category_min(category),
        }
    }

    pub fn allows(&self, category: &str, level: LogLevel) -> bool {
        self.resolve(category).allows(level)
    }
}

/// A `SinkFilter` resolved for a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    range: LevelRange,
    category_min: Option<LogLevel>,
}

impl CategoryFilter {
    pub fn allows(&self, level: LogLevel) -> bool {
        self.range.contains(level) && self.category_min.map_or(true, |min| level >= min)
    }

    pub fn category_min(&self) -> Option<LogLevel> {
        self.category_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = LevelRange::new(LogLevel::Debug, Some(LogLevel::Warn));
        assert!(!range.contains(LogLevel::Trace));
        assert!(range.contains(LogLevel::Debug));
        assert!(range.contains(LogLevel::Info));
        assert!(range.contains(LogLevel::Warn));
        assert!(!range.contains(LogLevel::Error));
        assert!(!LevelRange::ALL.contains(LogLevel::Off));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let filter = SinkFilter::default()
            .with_rule("app", LogLevel::Warn)
            .with_rule("app::db", LogLevel::Trace);

        assert_eq!(filter.category_min("app::db::pool"), Some(LogLevel::Trace));
        assert_eq!(filter.category_min("app::http"), Some(LogLevel::Warn));
        assert_eq!(filter.category_min("other"), None);
    }

    #[test]
    fn test_prefix_match_ignores_case() {
        let filter = SinkFilter::default().with_rule("Microsoft", LogLevel::Warn);
        assert!(!filter.allows("microsoft.hosting", LogLevel::Info));
        assert!(filter.allows("MICROSOFT.hosting", LogLevel::Warn));
    }

    #[test]
    fn test_tie_goes_to_last_rule() {
        let filter = SinkFilter::default()
            .with_rule("app", LogLevel::Error)
            .with_rule("APP", LogLevel::Debug);
        assert_eq!(filter.category_min("app::x"), Some(LogLevel::Debug));
    }

    #[test]
    fn test_default_rule_matches_everything() {
        let filter = SinkFilter::default()
            .with_rule("Default", LogLevel::Info)
            .with_rule("app", LogLevel::Trace);
        assert_eq!(filter.category_min("anything"), Some(LogLevel::Info));
        assert_eq!(filter.category_min("app::main"), Some(LogLevel::Trace));
    }

    #[test]
    fn test_range_and_category_must_both_pass() {
        let filter = SinkFilter::new(LevelRange::new(LogLevel::Info, None)).with_rule("chatty", LogLevel::Trace);
        // The rule cannot widen the sink's range
        assert!(!filter.allows("chatty", LogLevel::Debug));
        assert!(filter.allows("chatty", LogLevel::Info));
    }

    #[test]
    fn test_off_silences_category() {
        let filter = SinkFilter::default().with_rule("noisy", LogLevel::Off);
        for level in LogLevel::RECORD_LEVELS {
            assert!(!filter.allows("noisy::module", level));
        }
        assert!(filter.allows("quiet", LogLevel::Trace));
    }

    #[test]
    fn test_output_rule_overrides_global_rule() {
        let mut global = LoggerConfig::default();
        global.category_filters.insert("app::db".into(), LogLevel::Error);
        let output = OutputConfig::new("logs/").with_filter("app::db", LogLevel::Debug);

        let filter = SinkFilter::for_output(&output, &global);
        assert!(filter.allows("app::db", LogLevel::Debug));

        let isolated = SinkFilter::for_output(&output.clone().without_global_filters(), &global);
        assert_eq!(isolated.rules().len(), 1);
    }

    #[test]
    fn test_console_filter() {
        let mut global = LoggerConfig::default();
        global.console_min_level = LogLevel::Info;
        global.category_filters.insert("app".into(), LogLevel::Error);
        global.console_category_filters.insert("app".into(), LogLevel::Warn);

        let filter = SinkFilter::for_console(&global);
        assert!(filter.allows("app::x", LogLevel::Warn));
        assert!(!filter.allows("other", LogLevel::Debug));

        global.console_use_global_filters = false;
        global.console_category_filters.clear();
        assert!(SinkFilter::for_console(&global).allows("app", LogLevel::Info));
    }
}
