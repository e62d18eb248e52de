//! Retention cleanup of aged log files
//!
//! The service runs one pass when it starts and, if background cleanup is
//! enabled, one more pass every `cleanup_interval` on its own thread. A pass
//! deletes `*.log` files directly inside each output's directory whose
//! modification time is older than `retention_days`.
//!
//! On unix, rolling appenders hold an advisory shared lock on the file they
//! write and a pass skips any file it cannot lock exclusively. Other
//! platforms take no locks and delete by age alone, so a file still open
//! for writing may be removed if it has not been touched for the whole
//! retention period.

use crate::config::settings::LoggerConfig;
use crossbeam_channel::{bounded, select, tick, Sender};
#[cfg(unix)]
use fs2::FileExt;
use parking_lot::Mutex;
#[cfg(unix)]
use std::fs::File;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Directory scanned for an output path
///
/// A path ending in a separator is a directory; otherwise it is a file-name
/// prefix and its parent is scanned. A prefix without a parent is used as is.
pub fn retention_directory(path: &str) -> PathBuf {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.len() != path.len() {
        return if trimmed.is_empty() {
            PathBuf::from(&path[..1])
        } else {
            PathBuf::from(trimmed)
        };
    }

    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from(trimmed),
    }
}

#[derive(Debug, Default)]
struct CleanupStats {
    passes: AtomicU64,
    deleted: AtomicU64,
}

/// Delete one expired file unless a writer still holds it
#[cfg(unix)]
fn remove_expired(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    // Rolling appenders keep a shared lock on the file they write
    if FileExt::try_lock_exclusive(&file).is_err() {
        return false;
    }
    drop(file);
    fs::remove_file(path).is_ok()
}

/// Delete one expired file
#[cfg(not(unix))]
fn remove_expired(path: &Path) -> bool {
    fs::remove_file(path).is_ok()
}

fn clean_directory(directory: &Path, cutoff: SystemTime) -> u64 {
    let Ok(entries) = fs::read_dir(directory) else {
        return 0;
    };

    let mut deleted = 0;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let is_log = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("log"));
        if !is_log {
            continue;
        }

        let expired = entry
            .metadata()
            .ok()
            .filter(|meta| meta.is_file())
            .and_then(|meta| meta.modified().ok())
            .is_some_and(|modified| modified < cutoff);
        if expired && remove_expired(&path) {
            deleted += 1;
        }
    }
    deleted
}

fn run_pass(config: &LoggerConfig, stats: &CleanupStats, now: SystemTime) -> u64 {
    stats.passes.fetch_add(1, Ordering::Relaxed);
    if config.retention_days == 0 {
        return 0;
    }

    let retention = Duration::from_secs(u64::from(config.retention_days) * SECONDS_PER_DAY);
    let Some(cutoff) = now.checked_sub(retention) else {
        return 0;
    };

    let mut directories: Vec<PathBuf> = config
        .effective_outputs()
        .iter()
        .map(|output| retention_directory(&output.path))
        .collect();
    directories.sort();
    directories.dedup();

    let deleted = directories.iter().map(|dir| clean_directory(dir, cutoff)).sum();
    stats.deleted.fetch_add(deleted, Ordering::Relaxed);
    deleted
}

/// Periodic deletion of log files older than the retention period
///
/// IO errors are ignored file by file; a pass never fails.
pub struct RetentionCleanupService {
    config: Arc<LoggerConfig>,
    stats: Arc<CleanupStats>,
    shutdown: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl RetentionCleanupService {
    /// Run one pass now and schedule the background timer if enabled
    ///
    /// The first background pass runs one `cleanup_interval` after start.
    pub fn start(config: Arc<LoggerConfig>) -> Self {
        let stats = Arc::new(CleanupStats::default());
        run_pass(&config, &stats, SystemTime::now());

        let mut shutdown = None;
        let mut worker = None;
        if config.background_cleanup_enabled && config.retention_days > 0 {
            let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
            let config_clone = Arc::clone(&config);
            let stats_clone = Arc::clone(&stats);

            let spawned = thread::Builder::new()
                .name("log-retention-cleanup".to_string())
                .spawn(move || {
                    let ticker = tick(config_clone.cleanup_interval);
                    loop {
                        select! {
                            recv(ticker) -> _ => {
                                run_pass(&config_clone, &stats_clone, SystemTime::now());
                            }
                            // Signalled or sender dropped
                            recv(shutdown_rx) -> _ => break,
                        }
                    }
                });

            match spawned {
                Ok(handle) => {
                    shutdown = Some(shutdown_tx);
                    worker = Some(handle);
                }
                Err(e) => {
                    eprintln!("[LOGGER WARNING] Failed to start retention cleanup thread: {}", e);
                }
            }
        }

        Self {
            config,
            stats,
            shutdown: Mutex::new(shutdown),
            worker: Mutex::new(worker),
            disposed: AtomicBool::new(false),
        }
    }

    /// Run a pass now; returns the number of files deleted
    pub fn cleanup_old_logs(&self) -> u64 {
        self.cleanup_old_logs_at(SystemTime::now())
    }

    /// Run a pass with `now` as the reference time
    pub fn cleanup_old_logs_at(&self, now: SystemTime) -> u64 {
        run_pass(&self.config, &self.stats, now)
    }

    /// Passes run so far, including the one at start
    pub fn passes_run(&self) -> u64 {
        self.stats.passes.load(Ordering::Relaxed)
    }

    pub fn files_deleted(&self) -> u64 {
        self.stats.deleted.load(Ordering::Relaxed)
    }

    pub fn is_background_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Stop the timer and wait for an in-flight pass to finish
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }
        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Retention cleanup thread panicked");
            }
        }
    }
}

impl Drop for RetentionCleanupService {
    fn drop(&mut self) {
        self.dispose();
    }
}
