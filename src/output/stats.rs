//! Run statistics
//!
//! Workers tally page and record outcomes as they complete; the summary is
//! read once at the end of the run. Counters are atomics so the tallies
//! never contend with the frontier's mutex.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters for one crawl run
#[derive(Debug, Default)]
pub struct RunStats {
    pages_visited: AtomicUsize,
    pages_normal: AtomicUsize,
    pages_blocked: AtomicUsize,
    pages_empty: AtomicUsize,
    pages_failed: AtomicUsize,
    fetch_retries: AtomicUsize,
    records_pushed: AtomicUsize,
    records_dropped: AtomicUsize,
    sink_errors: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_normal_page(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
        self.pages_normal.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked_page(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
        self.pages_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_page(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
        self.pages_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_page(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.fetch_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pushed(&self, count: usize) {
        self.records_pushed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: usize) {
        self.records_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_sink_error(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot of all counters
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            pages_visited: self.pages_visited.load(Ordering::Relaxed),
            pages_normal: self.pages_normal.load(Ordering::Relaxed),
            pages_blocked: self.pages_blocked.load(Ordering::Relaxed),
            pages_empty: self.pages_empty.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            fetch_retries: self.fetch_retries.load(Ordering::Relaxed),
            records_pushed: self.records_pushed.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
        }
    }
}

/// Final numbers for one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_visited: usize,
    pub pages_normal: usize,
    pub pages_blocked: usize,
    pub pages_empty: usize,
    pub pages_failed: usize,
    pub fetch_retries: usize,
    pub records_pushed: usize,
    pub records_dropped: usize,
    pub sink_errors: usize,
}

impl RunSummary {
    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Run complete: {} pages visited ({} normal, {} blocked, {} empty, {} failed), \
             {} records pushed, {} dropped, {} retries, {} sink errors",
            self.pages_visited,
            self.pages_normal,
            self.pages_blocked,
            self.pages_empty,
            self.pages_failed,
            self.records_pushed,
            self.records_dropped,
            self.fetch_retries,
            self.sink_errors,
        );
    }
}
