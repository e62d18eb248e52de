//! Criterion benchmarks for rust_logger_composite

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_logger_composite::prelude::*;
use rust_logger_composite::{LevelRange, SinkEndpoint, SinkFilter};
use std::sync::Arc;
use tempfile::TempDir;

/// Provider whose loggers accept everything and write nowhere
struct NullProvider;

struct NullLogger;

impl Logger for NullLogger {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off
    }

    fn log(&self, record: &Record<'_>) {
        black_box(record.level());
    }

    fn begin_scope(&self, _context: LogContext) -> ScopeGuard {
        ScopeGuard::noop()
    }
}

impl LoggerProvider for NullProvider {
    fn create_logger(&self, _category: &str) -> Arc<dyn Logger> {
        Arc::new(NullLogger)
    }
}

fn null_factory(sinks: usize, range: LevelRange) -> CompositeLoggerFactory {
    let endpoints = (0..sinks)
        .map(|i| {
            Arc::new(SinkEndpoint::new(format!("null-{}", i), SinkFilter::new(range), Arc::new(NullProvider)))
                as Arc<dyn LoggerFactory>
        })
        .collect();
    CompositeLoggerFactory::new(endpoints)
}

// ============================================================================
// Fan-out Benchmarks
// ============================================================================

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    group.throughput(Throughput::Elements(1));

    for sinks in [1, 3, 8] {
        let factory = null_factory(sinks, LevelRange::ALL);
        let logger = factory.create_logger("bench::fan_out");

        group.bench_with_input(BenchmarkId::new("info", sinks), &sinks, |b, _| {
            b.iter(|| logger.info(black_box("Fan-out message")));
        });
    }

    group.finish();
}

fn bench_disabled_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("disabled_level");
    group.throughput(Throughput::Elements(1));

    let factory = null_factory(3, LevelRange::at_least(LogLevel::Error));
    let logger = factory.create_logger("bench::disabled");

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_enabled(black_box(LogLevel::Debug))));
    });

    group.bench_function("debug", |b| {
        b.iter(|| logger.debug(black_box("Filtered out")));
    });

    group.finish();
}

fn bench_create_logger(c: &mut Criterion) {
    let factory = null_factory(3, LevelRange::ALL);

    c.bench_function("create_logger", |b| {
        b.iter(|| black_box(factory.create_logger(black_box("bench::category::nested"))));
    });
}

// ============================================================================
// Filter Benchmarks
// ============================================================================

fn bench_category_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("category_resolution");

    for rules in [1, 10, 50] {
        let filter = (0..rules).fold(SinkFilter::default(), |filter, i| {
            filter.with_rule(format!("app::module{}", i), LogLevel::Warn)
        });

        group.bench_with_input(BenchmarkId::from_parameter(rules), &filter, |b, filter| {
            b.iter(|| black_box(filter.resolve(black_box("app::module7::handler"))));
        });
    }

    group.finish();
}

// ============================================================================
// File Sink Benchmarks
// ============================================================================

fn bench_file_sinks(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_sinks");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let factory = LoggerFactoryBuilder::new()
        .add_file_output(format!("{}/all/", temp_dir.path().display()), LogLevel::Trace, None)
        .add_file_output(format!("{}/info/", temp_dir.path().display()), LogLevel::Info, None)
        .with_async_buffer(65536)
        .with_overflow_policy(OverflowPolicy::DropNewest)
        .build()
        .expect("Failed to build factory");
    let logger = factory.create_logger("bench::files");

    group.bench_function("async_info", |b| {
        b.iter(|| logger.info(black_box("File message")));
    });

    group.bench_function("async_info_scoped", |b| {
        let _scope = logger.begin_scope(LogContext::new().with_field("request_id", 42));
        b.iter(|| logger.info(black_box("Scoped file message")));
    });

    group.finish();
    factory.dispose();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_fan_out,
    bench_disabled_level,
    bench_create_logger,
    bench_category_resolution,
    bench_file_sinks
);

criterion_main!(benches);
