//! Progress counters shared with the progress reporter
//!
//! Written only by the aggregator thread and read by the progress bar.
//! The authoritative tallies live inside the aggregator itself.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Atomic progress view of a running benchmark
pub struct ProgressCounters {
    /// Outcomes observed so far
    finished: AtomicU64,

    /// Failed outcomes observed so far
    failed: AtomicU64,

    /// Shutdown signal for the progress reporter
    shutdown: AtomicBool,

    /// Expected number of outcomes
    total: u64,
}

impl ProgressCounters {
    /// Create counters for a run of `total` tasks
    pub fn new(total: u64) -> Self {
        Self {
            finished: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            total,
        }
    }

    /// Record one observed outcome
    #[inline]
    pub fn record(&self, succeeded: bool) {
        if !succeeded {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Expected number of outcomes
    pub fn total(&self) -> u64 {
        self.total
    }

    /// (finished, failed) snapshot
    pub fn progress(&self) -> (u64, u64) {
        (
            self.finished.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }

    /// Check if every expected outcome has been observed
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.finished.load(Ordering::Relaxed) >= self.total
    }

    /// Signal shutdown to the progress reporter
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been signaled
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
