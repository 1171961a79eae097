//! Benchmark configuration derived from CLI arguments

use super::cli::{CliArgs, OutputFormat};
use std::path::PathBuf;
use std::time::Duration;

/// Complete benchmark configuration
///
/// Immutable once built; workers share it through an `Arc`.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    // Target
    pub api_key: String,
    pub endpoint: String,
    pub request_timeout: Duration,

    // Load shape
    pub workers: usize,
    pub requests: u64,
    pub queue_depth: usize,

    // Event
    pub event_name: String,
    pub subject_id: String,

    // Output
    pub output_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl BenchConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        args.validate()?;

        Ok(Self {
            api_key: args.api_key.clone(),
            endpoint: args.endpoint.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_millis(args.timeout_ms),

            workers: args.concurrent,
            requests: args.requests,
            queue_depth: args.effective_queue_depth(),

            event_name: args.event_name.clone(),
            subject_id: args.subject_id.clone(),

            output_path: args.output.clone(),
            output_format: args.output_format,
            quiet: args.quiet,
        })
    }

    /// Minimal configuration for programmatic runs
    pub fn new(workers: usize, requests: u64) -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            request_timeout: Duration::from_secs(10),
            workers,
            requests,
            queue_depth: workers
                .saturating_mul(4)
                .min(usize::try_from(requests).unwrap_or(usize::MAX))
                .max(1),
            event_name: "stress-test-event".to_string(),
            subject_id: "stress-test-user".to_string(),
            output_path: None,
            output_format: OutputFormat::Json,
            quiet: true,
        }
    }

    /// API key with the middle masked, safe to print
    pub fn masked_api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }
}

/// Mask an API key for display: first and last four characters only
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
