//! Benchmark orchestrator
//!
//! Coordinates the task source, worker threads and the aggregator, and
//! manages the run lifecycle:
//!
//! 1. start the aggregator (single consumer of outcomes)
//! 2. start the task feeder and `W` worker threads
//! 3. join every worker (drain barrier)
//! 4. drop the last outcome sender, closing the outcome channel
//! 5. join the aggregator and freeze its tally into [`RunStats`]
//!
//! If a thread cannot be started the run is aborted: shutdown is
//! signaled, the queues are closed and everything already running is
//! joined before the error is returned.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use super::aggregator::{Aggregator, Tally};
use super::counters::ProgressCounters;
use super::task_source::TaskSource;
use super::worker::{Outcome, Worker, WorkerSummary};
use crate::client::EventSink;
use crate::config::BenchConfig;
use crate::metrics::stats::{format_count, RunStats};
use crate::utils::{BenchError, Result};

/// Benchmark orchestrator
pub struct Orchestrator {
    config: Arc<BenchConfig>,
    sink: Arc<dyn EventSink>,
    /// Worker spawns from this index on fail with an I/O error
    #[cfg(test)]
    spawn_limit: Option<usize>,
}

impl Orchestrator {
    /// Create new orchestrator
    pub fn new(config: BenchConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        if config.workers == 0 {
            return Err(BenchError::Config(
                "At least one worker is required".to_string(),
            ));
        }

        Ok(Self {
            config: Arc::new(config),
            sink,
            #[cfg(test)]
            spawn_limit: None,
        })
    }

    /// Report progress during benchmark
    fn report_progress(counters: &ProgressCounters) {
        let pb = ProgressBar::new(counters.total());
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let start = Instant::now();
        let mut last_finished = 0u64;
        let mut last_time = start;

        while !counters.is_shutdown() {
            let (finished, _) = counters.progress();
            pb.set_position(finished);

            let now = Instant::now();
            let interval = now.duration_since(last_time).as_secs_f64();
            if interval >= 0.5 {
                let throughput = (finished - last_finished) as f64 / interval;
                pb.set_message(format!("{}/s", format_count(throughput as u64)));
                last_finished = finished;
                last_time = now;
            }

            if counters.is_complete() {
                break;
            }

            thread::sleep(Duration::from_millis(100));
        }

        let (finished, failed) = counters.progress();
        pb.set_position(finished);
        pb.finish_with_message(format!("done, {} failed", format_count(failed)));
    }

    /// Start one worker thread
    fn spawn_worker(
        &self,
        worker_id: usize,
        tasks: TaskSource,
        outcomes: Sender<Outcome>,
        counters: Arc<ProgressCounters>,
    ) -> io::Result<JoinHandle<WorkerSummary>> {
        #[cfg(test)]
        {
            if self.spawn_limit.is_some_and(|limit| worker_id >= limit) {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "worker spawn limit reached",
                ));
            }
        }

        let worker = Worker::new(worker_id, Arc::clone(&self.sink), Arc::clone(&self.config));
        thread::Builder::new()
            .name(format!("worker-{}", worker_id))
            .spawn(move || worker.run(tasks, outcomes, &counters))
    }

    /// Join the aggregator, then stop and join the progress reporter
    fn join_collectors(
        counters: &ProgressCounters,
        aggregator: JoinHandle<Result<Tally>>,
        progress: Option<JoinHandle<()>>,
    ) -> Result<Tally> {
        let tally = aggregator
            .join()
            .map_err(|_| BenchError::Worker("aggregator thread panicked".to_string()))
            .and_then(|r| r);

        counters.signal_shutdown();
        if let Some(handle) = progress {
            // The progress bar is cosmetic
            let _ = handle.join();
        }
        tally
    }

    /// Run the benchmark to completion
    ///
    /// Submission failures are part of the statistics, never an error.
    /// Errors are reserved for threads that could not be started or
    /// that panicked. Every thread the run started has been joined by
    /// the time it returns, on the error paths as well.
    pub fn run(&self) -> Result<RunStats> {
        let total = self.config.requests;
        let workers = self.config.workers;
        let depth = self.config.queue_depth.max(1);

        info!(
            "Dispatching {} events over {} workers (queue depth {})",
            total, workers, depth
        );

        let counters = Arc::new(ProgressCounters::new(total));
        let start_time = Instant::now();

        // Aggregator first, so workers never block on a missing consumer
        let (outcome_tx, outcome_rx) = bounded(depth);
        let aggregator = Aggregator::new(outcome_rx, Arc::clone(&counters));
        let aggregator_handle = thread::Builder::new()
            .name("aggregator".to_string())
            .spawn(move || aggregator.run())?;

        let progress_handle = if self.config.quiet {
            None
        } else {
            let counters = Arc::clone(&counters);
            Some(thread::spawn(move || Self::report_progress(&counters)))
        };

        let (tasks, feeder) = match TaskSource::spawn(total, depth) {
            Ok(pair) => pair,
            Err(e) => {
                drop(outcome_tx);
                let _ = Self::join_collectors(&counters, aggregator_handle, progress_handle);
                return Err(e);
            }
        };

        let mut handles: Vec<JoinHandle<WorkerSummary>> = Vec::with_capacity(workers);
        let mut spawn_error = None;
        for worker_id in 0..workers {
            let spawned = self.spawn_worker(
                worker_id,
                tasks.clone(),
                outcome_tx.clone(),
                Arc::clone(&counters),
            );
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("Failed to start worker {}: {}", worker_id, e);
                    // Started workers stop before their next submission
                    counters.signal_shutdown();
                    spawn_error = Some(e);
                    break;
                }
            }
        }
        // Workers hold the only remaining consumers; once they are gone
        // the feeder's sends fail and it exits
        drop(tasks);

        // Drain barrier: every outcome has been sent once all workers return
        let mut processed = 0u64;
        let mut panicked = 0usize;
        for handle in handles {
            match handle.join() {
                Ok(summary) => {
                    debug!(
                        "Worker {} done: {} tasks, {} failed",
                        summary.worker_id, summary.tasks_processed, summary.failures
                    );
                    processed += summary.tasks_processed;
                }
                Err(_) => panicked += 1,
            }
        }
        let elapsed = start_time.elapsed();
        let fed = feeder.join();

        // Close the outcome channel exactly once, after the drain
        drop(outcome_tx);
        let tally = Self::join_collectors(&counters, aggregator_handle, progress_handle);

        if let Some(e) = spawn_error {
            return Err(e.into());
        }

        if panicked > 0 {
            return Err(BenchError::Worker(format!(
                "{} of {} worker threads panicked",
                panicked, workers
            )));
        }

        let fed = fed?;
        let tally = tally?;
        if tally.total() != processed || processed != fed {
            return Err(BenchError::Worker(format!(
                "outcome mismatch: {} tasks fed, {} processed, {} aggregated",
                fed,
                processed,
                tally.total()
            )));
        }

        let stats = tally.into_stats(elapsed);
        info!(
            "Run complete: {} succeeded, {} failed in {:.2}s",
            stats.succeeded,
            stats.failed,
            elapsed.as_secs_f64()
        );
        Ok(stats)
    }
}
