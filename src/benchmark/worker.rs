//! Benchmark worker thread implementation
//!
//! Each worker pulls task ordinals from the shared task source, submits
//! one event per task through the shared sink and emits one outcome per
//! task. Workers never touch the tallies; the aggregator owns them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossbeam_channel::Sender;
use tracing::{debug, trace, warn};

use super::counters::ProgressCounters;
use super::task_source::TaskSource;
use crate::client::{CaptureEvent, EventSink};
use crate::config::BenchConfig;

/// Result of one submission attempt
///
/// Not correlated with the task that produced it; aggregation is
/// count-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub succeeded: bool,
    /// Wall-clock time spent inside `submit`
    pub latency: Duration,
}

/// Result from a worker thread
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker ID
    pub worker_id: usize,
    /// Tasks taken from the source and reported as outcomes
    pub tasks_processed: u64,
    /// Of those, how many failed
    pub failures: u64,
}

/// Benchmark worker (runs in dedicated OS thread)
pub struct Worker {
    id: usize,
    sink: Arc<dyn EventSink>,
    config: Arc<BenchConfig>,
}

impl Worker {
    /// Create new worker
    pub fn new(id: usize, sink: Arc<dyn EventSink>, config: Arc<BenchConfig>) -> Self {
        Self { id, sink, config }
    }

    /// Main worker loop
    ///
    /// Returns once the task source is exhausted or shutdown is signaled.
    /// A failed submission is recorded as a failed outcome and the loop
    /// moves on; nothing is retried.
    pub fn run(
        self,
        tasks: TaskSource,
        outcomes: Sender<Outcome>,
        counters: &ProgressCounters,
    ) -> WorkerSummary {
        let mut summary = WorkerSummary {
            worker_id: self.id,
            ..Default::default()
        };

        for task in tasks {
            // Aborted run: leave the task unsubmitted
            if counters.is_shutdown() {
                debug!("Worker {}: shutdown signaled, stopping", self.id);
                break;
            }
            trace!(worker = self.id, %task, "submitting");

            let event = CaptureEvent::stress(&self.config, Utc::now());
            let start = Instant::now();
            let succeeded = self.sink.submit(&event).is_ok();
            let outcome = Outcome {
                succeeded,
                latency: start.elapsed(),
            };

            // Only possible if the aggregator is gone
            if outcomes.send(outcome).is_err() {
                warn!("Worker {}: outcome channel closed, stopping", self.id);
                break;
            }

            summary.tasks_processed += 1;
            if !succeeded {
                summary.failures += 1;
            }
        }

        summary
    }
}
