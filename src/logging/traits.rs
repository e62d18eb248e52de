//! Logger, provider and factory abstractions
//!
//! A `LoggerFactory` hands out category loggers; a `LoggerProvider` is one
//! backend a factory can write through. The composite factory is itself a
//! `LoggerFactory` over several sink factories.

use crate::core::log_context::LogContext;
use crate::core::log_level::LogLevel;
use crate::core::record::Record;
use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Arc;

/// A category logger
///
/// Logging never returns errors; implementations swallow or report
/// failures themselves.
pub trait Logger: Send + Sync {
    fn is_enabled(&self, level: LogLevel) -> bool;

    fn log(&self, record: &Record<'_>);

    /// Attach `context` to records logged on this thread until the guard is released
    fn begin_scope(&self, context: LogContext) -> ScopeGuard;
}

/// One logging backend
pub trait LoggerProvider: Send + Sync {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger>;

    fn flush(&self) {}

    /// Release the backend; loggers created earlier stop writing
    fn dispose(&self) {}
}

pub trait LoggerFactory: Send + Sync {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger>;

    /// Register a provider; only loggers created afterwards use it
    fn add_provider(&self, provider: Arc<dyn LoggerProvider>);

    fn flush(&self) {}

    /// Idempotent
    fn dispose(&self);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn is_enabled(&self, level: LogLevel) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, record: &Record<'_>) {
        (**self).log(record)
    }

    fn begin_scope(&self, context: LogContext) -> ScopeGuard {
        (**self).begin_scope(context)
    }
}

enum ScopeHandle {
    Noop,
    Release(Box<dyn FnOnce() + Send>),
    Composite(Vec<ScopeGuard>),
}

/// Handle to an open scope
///
/// The scope ends when the guard is released explicitly or dropped. A
/// composite guard releases its parts in acquisition order; a part that
/// panics does not keep the others open.
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard {
    handle: ScopeHandle,
}

impl ScopeGuard {
    pub fn noop() -> Self {
        Self { handle: ScopeHandle::Noop }
    }

    pub fn on_release(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            handle: ScopeHandle::Release(Box::new(release)),
        }
    }

    pub fn composite(guards: Vec<ScopeGuard>) -> Self {
        Self {
            handle: ScopeHandle::Composite(guards),
        }
    }

    /// Number of underlying handles still held
    pub fn handle_count(&self) -> usize {
        match &self.handle {
            ScopeHandle::Noop => 0,
            ScopeHandle::Release(_) => 1,
            ScopeHandle::Composite(guards) => guards.iter().map(ScopeGuard::handle_count).sum(),
        }
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        match std::mem::replace(&mut self.handle, ScopeHandle::Noop) {
            ScopeHandle::Noop => {}
            ScopeHandle::Release(release) => release(),
            ScopeHandle::Composite(guards) => {
                for guard in guards {
                    if panic::catch_unwind(AssertUnwindSafe(|| guard.release())).is_err() {
                        eprintln!("[LOGGER ERROR] Scope release panicked; remaining scopes still released");
                    }
                }
            }
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("handles", &self.handle_count())
            .finish()
    }
}

/// Level shortcuts available on every logger
///
/// The caller's location is recorded through `#[track_caller]`.
pub trait LoggerExt: Logger {
    #[track_caller]
    fn log_message(&self, level: LogLevel, message: impl fmt::Display) {
        if self.is_enabled(level) {
            let caller = Location::caller();
            self.log(
                &Record::new(level, format_args!("{}", message)).with_location(caller.file(), caller.line()),
            );
        }
    }

    #[track_caller]
    fn trace(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Trace, message)
    }

    #[track_caller]
    fn debug(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Debug, message)
    }

    #[track_caller]
    fn info(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Info, message)
    }

    #[track_caller]
    fn warn(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Warn, message)
    }

    #[track_caller]
    fn error(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Error, message)
    }

    #[track_caller]
    fn critical(&self, message: impl fmt::Display) {
        self.log_message(LogLevel::Critical, message)
    }

    /// Log `message` with `error` and its source chain attached
    #[track_caller]
    fn log_error(&self, level: LogLevel, message: impl fmt::Display, error: &(dyn Error + 'static)) {
        if self.is_enabled(level) {
            let caller = Location::caller();
            self.log(
                &Record::new(level, format_args!("{}", message))
                    .with_error(error)
                    .with_location(caller.file(), caller.line()),
            );
        }
    }
}

impl<L: Logger + ?Sized> LoggerExt for L {}

/// Logger whose category is the type name of `T`
pub struct TypedLogger<T: ?Sized> {
    inner: Arc<dyn Logger>,
    _category: PhantomData<fn(&T)>,
}

impl<T: ?Sized> TypedLogger<T> {
    pub fn new(factory: &dyn LoggerFactory) -> Self {
        Self::from_logger(factory.create_logger(Self::category()))
    }

    pub fn from_logger(inner: Arc<dyn Logger>) -> Self {
        Self {
            inner,
            _category: PhantomData,
        }
    }

    pub fn category() -> &'static str {
        type_name::<T>()
    }

    pub fn into_inner(self) -> Arc<dyn Logger> {
        self.inner
    }
}

impl<T: ?Sized> Clone for TypedLogger<T> {
    fn clone(&self) -> Self {
        Self::from_logger(Arc::clone(&self.inner))
    }
}

impl<T: ?Sized> Deref for TypedLogger<T> {
    type Target = dyn Logger;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl<T: ?Sized> Logger for TypedLogger<T> {
    fn is_enabled(&self, level: LogLevel) -> bool {
        self.inner.is_enabled(level)
    }

    fn log(&self, record: &Record<'_>) {
        self.inner.log(record)
    }

    fn begin_scope(&self, context: LogContext) -> ScopeGuard {
        self.inner.begin_scope(context)
    }
}

impl<T: ?Sized> fmt::Debug for TypedLogger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedLogger").field("category", &Self::category()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<(LogLevel, String, Option<u32>, usize)>>,
    }

    impl Logger for RecordingLogger {
        fn is_enabled(&self, level: LogLevel) -> bool {
            level >= LogLevel::Debug
        }

        fn log(&self, record: &Record<'_>) {
            let chain = record.error().map_or(0, |e| crate::core::record::error_chain(e).len());
            self.lines
                .lock()
                .push((record.level(), record.args().to_string(), record.line(), chain));
        }

        fn begin_scope(&self, _context: LogContext) -> ScopeGuard {
            ScopeGuard::noop()
        }
    }

    #[test]
    fn test_level_shortcuts_respect_is_enabled() {
        let logger = RecordingLogger::default();
        logger.trace("hidden");
        logger.debug("shown");
        logger.critical(format!("count={}", 3));

        let lines = logger.lines.lock();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].1, "shown");
        assert_eq!(lines[1].0, LogLevel::Critical);
        assert_eq!(lines[1].1, "count=3");
        assert!(lines[1].2.is_some());
    }

    #[test]
    fn test_log_error_attaches_error() {
        let logger = RecordingLogger::default();
        let err = std::io::Error::other("boom");
        logger.log_error(LogLevel::Error, "operation failed", &err);

        let lines = logger.lines.lock();
        assert_eq!(lines[0].3, 1);
    }

    #[test]
    fn test_scope_guard_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let guard = ScopeGuard::on_release(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(guard.handle_count(), 1);
        guard.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_composite_guard_releases_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let guards = (0..3)
            .map(|i| {
                let order = Arc::clone(&order);
                ScopeGuard::on_release(move || order.lock().push(i))
            })
            .collect();

        let guard = ScopeGuard::composite(vec![ScopeGuard::composite(guards), ScopeGuard::noop()]);
        assert_eq!(guard.handle_count(), 3);
        drop(guard);

        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_composite_guard_survives_panicking_part() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let guard = ScopeGuard::composite(vec![
            ScopeGuard::on_release(|| panic!("release failed")),
            ScopeGuard::on_release(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        ]);
        guard.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    struct Payments;

    #[test]
    fn test_typed_logger_category() {
        assert!(TypedLogger::<Payments>::category().ends_with("tests::Payments"));

        let typed = TypedLogger::<Payments>::from_logger(Arc::new(RecordingLogger::default()));
        assert!(typed.is_enabled(LogLevel::Info));
        typed.info("via deref");
    }
}
