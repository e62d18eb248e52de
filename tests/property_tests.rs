//! Property-based tests for rust_logger_composite using proptest

use proptest::prelude::*;
use rust_logger_composite::prelude::*;
use rust_logger_composite::{retention_directory, LevelRange, LogEntry, SinkEndpoint, SinkFilter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn record_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::RECORD_LEVELS.to_vec())
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![record_level(), Just(LogLevel::Off)]
}

fn level_range() -> impl Strategy<Value = LevelRange> {
    (record_level(), prop::option::of(record_level())).prop_map(|(a, b)| match b {
        Some(b) if b < a => LevelRange::new(b, Some(a)),
        b => LevelRange::new(a, b),
    })
}

fn category() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(::[a-z]{1,6}){0,3}"
}

// ============================================================================
// Level Range Tests
// ============================================================================

proptest! {
    /// A record is accepted iff min <= level <= max
    #[test]
    fn test_range_membership(range in level_range(), level in record_level()) {
        let expected = level >= range.min && range.max.map_or(true, |max| level <= max);
        prop_assert_eq!(range.contains(level), expected);
    }

    /// Both bounds are inclusive; their outer neighbours are excluded
    #[test]
    fn test_range_boundaries(range in level_range()) {
        prop_assert!(range.contains(range.min));
        if let Some(max) = range.max {
            prop_assert!(range.contains(max));
        }

        let levels = LogLevel::RECORD_LEVELS;
        let min_index = levels.iter().position(|l| *l == range.min).unwrap();
        if min_index > 0 {
            prop_assert!(!range.contains(levels[min_index - 1]));
        }
        if let Some(max) = range.max {
            let max_index = levels.iter().position(|l| *l == max).unwrap();
            if max_index + 1 < levels.len() {
                prop_assert!(!range.contains(levels[max_index + 1]));
            }
        }
    }

    /// Off never passes any range
    #[test]
    fn test_off_is_never_a_record_level(range in level_range()) {
        prop_assert!(!range.contains(LogLevel::Off));
    }

    /// The same range holds on a real sink endpoint
    #[test]
    fn test_output_range_on_endpoint(
        min in record_level(),
        max in prop::option::of(record_level()),
        level in record_level(),
    ) {
        prop_assume!(max.map_or(true, |max| min <= max));
        let output = OutputConfig::new("unused/").with_levels(min, max);
        let filter = SinkFilter::for_output(&output, &LoggerConfig::default());
        prop_assert_eq!(filter.allows("any::category", level), output.accepts_level(level));
    }
}

// ============================================================================
// Category Filter Precedence Tests
// ============================================================================

proptest! {
    /// A per-sink rule wins over a global rule for the same category
    #[test]
    fn test_sink_rule_beats_global_rule(
        category in category(),
        global_min in any_level(),
        sink_min in any_level(),
        level in record_level(),
    ) {
        let mut global = LoggerConfig::default();
        global.category_filters.insert(category.clone(), global_min);
        let output = OutputConfig::new("unused/").with_filter(category.clone(), sink_min);

        let filter = SinkFilter::for_output(&output, &global);
        prop_assert_eq!(filter.category_min(&category), Some(sink_min));
        prop_assert_eq!(filter.allows(&category, level), level >= sink_min);
    }

    /// A longer matching prefix wins regardless of where its rule came from
    #[test]
    fn test_more_specific_global_rule_still_applies(
        parent in "[a-z]{1,6}",
        child in "[a-z]{1,6}",
        global_min in record_level(),
        sink_min in record_level(),
    ) {
        let specific = format!("{}::{}", parent, child);
        let mut global = LoggerConfig::default();
        global.category_filters.insert(specific.clone(), global_min);
        let output = OutputConfig::new("unused/").with_filter(parent, sink_min);

        let filter = SinkFilter::for_output(&output, &global);
        prop_assert_eq!(filter.category_min(&format!("{}::leaf", specific)), Some(global_min));
    }

    /// Opting out of global rules leaves only the sink's own
    #[test]
    fn test_opt_out_ignores_global_rules(category in category(), global_min in any_level()) {
        let mut global = LoggerConfig::default();
        global.category_filters.insert(category.clone(), global_min);
        let output = OutputConfig::new("unused/").without_global_filters();

        let filter = SinkFilter::for_output(&output, &global);
        prop_assert_eq!(filter.category_min(&category), None);
    }
}

// ============================================================================
// Composite Logger Tests
// ============================================================================

struct Fixed(bool);

impl Logger for Fixed {
    fn is_enabled(&self, _level: LogLevel) -> bool {
        self.0
    }

    fn log(&self, _record: &Record<'_>) {}

    fn begin_scope(&self, _context: LogContext) -> ScopeGuard {
        ScopeGuard::noop()
    }
}

struct FixedProvider(bool);

impl LoggerProvider for FixedProvider {
    fn create_logger(&self, _category: &str) -> Arc<dyn Logger> {
        Arc::new(Fixed(self.0))
    }
}

proptest! {
    /// is_enabled is the OR over constituents, for 0, 1 or N enabled
    #[test]
    fn test_is_enabled_is_or(flags in prop::collection::vec(any::<bool>(), 0..8), level in record_level()) {
        let endpoints: Vec<Arc<dyn LoggerFactory>> = flags
            .iter()
            .map(|flag| {
                Arc::new(SinkEndpoint::new("fixed", SinkFilter::default(), Arc::new(FixedProvider(*flag))))
                    as Arc<dyn LoggerFactory>
            })
            .collect();
        let factory = CompositeLoggerFactory::new(endpoints);

        let logger = factory.create_logger("composite");
        prop_assert_eq!(logger.is_enabled(level), flags.iter().any(|flag| *flag));
    }

    /// Scope guards cover every constituent
    #[test]
    fn test_scope_covers_every_constituent(count in 0usize..8) {
        let loggers: Vec<Arc<dyn Logger>> = (0..count).map(|_| Arc::new(Fixed(true)) as Arc<dyn Logger>).collect();
        let logger = CompositeLogger::new("scoped", loggers, Arc::new(LoggerMetrics::new()));
        prop_assert_eq!(logger.begin_scope(LogContext::new()).handle_count(), count);
    }
}

// ============================================================================
// Entry and Path Tests
// ============================================================================

proptest! {
    /// Messages never carry raw line breaks into the output
    #[test]
    fn test_message_has_no_line_breaks(message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, "prop", message);
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
    }

    /// A directory path is scanned as itself
    #[test]
    fn test_retention_directory_of_directory(dir in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        prop_assert_eq!(retention_directory(&format!("{}/", dir)), PathBuf::from(&dir));
    }

    /// A file-name prefix is scanned in its parent
    #[test]
    fn test_retention_directory_of_prefix(dir in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", prefix in "[a-z]{1,8}-") {
        let path = format!("{}/{}", dir, prefix);
        prop_assert_eq!(retention_directory(&path), Path::new(&dir).to_path_buf());
    }
}
