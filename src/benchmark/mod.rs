//! Benchmark orchestration and workers
//!
//! This module provides the multi-threaded dispatch and aggregation core:
//! - TaskSource: bounded queue handing out task ordinals 0..N
//! - Worker: submits one event per task and emits one outcome per task
//! - Aggregator: single consumer that tallies outcomes
//! - ProgressCounters: atomic progress view for the progress bar
//! - Orchestrator: wires them together and enforces join-then-close

pub mod aggregator;
pub mod counters;
pub mod orchestrator;
pub mod task_source;
pub mod worker;

pub use aggregator::{Aggregator, Tally};
pub use counters::ProgressCounters;
pub use orchestrator::Orchestrator;
pub use task_source::{TaskFeeder, TaskId, TaskSource};
pub use worker::{Outcome, Worker, WorkerSummary};
