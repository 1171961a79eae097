//! Command-line argument parsing
//!
//! Flags mirror the classic capture stress tool: an API key, a target
//! endpoint, concurrency and request count, plus the event identity.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Upper bound on `--concurrent`; each worker is a dedicated OS thread
pub const MAX_WORKERS: usize = 1024;

/// Load-generation harness for analytics event capture endpoints
#[derive(Parser, Debug, Clone)]
#[command(name = "capture-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Target =====
    /// Project API key (required)
    #[arg(short = 'k', long = "key")]
    pub api_key: String,

    /// Capture endpoint base URL
    #[arg(
        short = 'e',
        long = "endpoint",
        default_value = "https://your-posthog-instance.com"
    )]
    pub endpoint: String,

    /// Per-request timeout in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 10_000)]
    pub timeout_ms: u64,

    // ===== Load Shape =====
    /// Number of concurrent workers
    #[arg(short = 'c', long = "concurrent", default_value_t = 10)]
    pub concurrent: usize,

    /// Total number of events to submit
    #[arg(short = 'n', long = "requests", default_value_t = 100)]
    pub requests: u64,

    /// Capacity of the task and outcome queues (0 = auto)
    #[arg(long = "queue-depth", default_value_t = 0)]
    pub queue_depth: usize,

    // ===== Event =====
    /// Event name
    #[arg(long = "event", default_value = "stress-test-event")]
    pub event_name: String,

    /// Subject (distinct) id attached to every event
    #[arg(short = 'u', long = "user", default_value = "stress-test-user")]
    pub subject_id: String,

    // ===== Output Options =====
    /// Write the final statistics to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Format of the --output file
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Json)]
    pub output_format: OutputFormat,

    /// Quiet mode (no banner, no progress bar, errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Export format for results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("--key must not be empty".to_string());
        }

        if self.concurrent == 0 {
            return Err("--concurrent must be at least 1".to_string());
        }

        if self.concurrent > MAX_WORKERS {
            return Err(format!("--concurrent must be at most {}", MAX_WORKERS));
        }

        if self.event_name.trim().is_empty() {
            return Err("--event must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("--timeout-ms must be at least 1".to_string());
        }

        Ok(())
    }

    /// Get effective queue depth (0 = auto)
    ///
    /// Auto sizing keeps a few tasks buffered per worker without
    /// allocating a slot for every request of a large run.
    pub fn effective_queue_depth(&self) -> usize {
        if self.queue_depth > 0 {
            return self.queue_depth;
        }
        let per_workers = self.concurrent.saturating_mul(4);
        let requests = usize::try_from(self.requests).unwrap_or(usize::MAX);
        per_workers.min(requests).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test", "--key", "phc_abc"]);
        assert_eq!(args.api_key, "phc_abc");
        assert_eq!(args.endpoint, "https://your-posthog-instance.com");
        assert_eq!(args.concurrent, 10);
        assert_eq!(args.requests, 100);
        assert_eq!(args.event_name, "stress-test-event");
        assert_eq!(args.subject_id, "stress-test-user");
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_key_is_usage_error() {
        let err = CliArgs::try_parse_from(["test"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_short_flags() {
        let args = CliArgs::parse_from([
            "test", "-k", "key", "-c", "20", "-n", "1000", "-u", "alice", "-e",
            "http://localhost:8000",
        ]);
        assert_eq!(args.concurrent, 20);
        assert_eq!(args.requests, 1000);
        assert_eq!(args.subject_id, "alice");
        assert_eq!(args.endpoint, "http://localhost:8000");
    }

    #[test]
    fn test_validation_zero_workers() {
        let args = CliArgs::parse_from(["test", "--key", "k", "--concurrent", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_worker_cap() {
        let at_cap = MAX_WORKERS.to_string();
        let args = CliArgs::parse_from(["test", "--key", "k", "-c", at_cap.as_str()]);
        assert!(args.validate().is_ok());

        let over_cap = (MAX_WORKERS + 1).to_string();
        let args = CliArgs::parse_from(["test", "--key", "k", "-c", over_cap.as_str()]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_blank_key() {
        let args = CliArgs::parse_from(["test", "--key", "   "]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_effective_queue_depth() {
        let args = CliArgs::parse_from(["test", "--key", "k", "-c", "4", "-n", "1000"]);
        assert_eq!(args.effective_queue_depth(), 16);

        let args = CliArgs::parse_from(["test", "--key", "k", "-c", "4", "-n", "3"]);
        assert_eq!(args.effective_queue_depth(), 3);

        let args = CliArgs::parse_from(["test", "--key", "k", "-n", "0"]);
        assert_eq!(args.effective_queue_depth(), 1);

        let args = CliArgs::parse_from(["test", "--key", "k", "--queue-depth", "64"]);
        assert_eq!(args.effective_queue_depth(), 64);
    }
}
