//! capture-bench library
//!
//! Load-generation harness for analytics event capture endpoints: a fixed
//! pool of worker threads submits N events and a single aggregator
//! tallies the outcomes into throughput and success statistics.

pub mod benchmark;
pub mod client;
pub mod config;
pub mod metrics;
pub mod utils;

pub use benchmark::Orchestrator;
pub use client::{CaptureEvent, EventSink, HttpCaptureClient};
pub use config::{BenchConfig, CliArgs};
pub use metrics::{MetricsReporter, RunStats};
pub use utils::{BenchError, ClientError, Result};
