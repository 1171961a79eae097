//! Metrics reporter - output formatting and export
//!
//! Supports:
//! - Console (human-readable summary, always printed after a run)
//! - JSON file
//! - CSV file (header + one row)

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::stats::{format_rate, RunStats};
use crate::config::{BenchConfig, OutputFormat};
use crate::utils::Result;

const CSV_HEADER: &str = "total,succeeded,failed,success_rate,elapsed_secs,throughput,mean_ms,p50_ms,p95_ms,p99_ms,max_ms";

/// Metrics reporter
pub struct MetricsReporter<'a> {
    config: &'a BenchConfig,
}

impl<'a> MetricsReporter<'a> {
    /// Create new reporter for a run of `config`
    pub fn new(config: &'a BenchConfig) -> Self {
        Self { config }
    }

    /// Print the final summary to stdout
    pub fn print_console(&self, stats: &RunStats) {
        // Writing to stdout only fails if stdout is gone
        let _ = self.write_console(&mut io::stdout().lock(), stats);
    }

    /// Write the human-readable summary
    pub fn write_console<W: Write>(&self, out: &mut W, stats: &RunStats) -> io::Result<()> {
        writeln!(out, "----------------------------------------")?;
        writeln!(out, "Load test complete")?;
        writeln!(out, "Total requests: {}", stats.total)?;
        writeln!(out, "Succeeded: {}", stats.succeeded)?;
        writeln!(out, "Failed: {}", stats.failed)?;
        writeln!(out, "Success rate: {:.2}%", stats.success_rate())?;
        writeln!(out, "Elapsed: {:?}", stats.elapsed)?;
        writeln!(out, "Throughput: {} req/s", format_rate(stats.throughput()))?;
        if stats.total > 0 {
            writeln!(
                out,
                "Latency (ms): avg={:.2} p50={:.2} p95={:.2} p99={:.2} max={:.2}",
                stats.mean_latency_ms(),
                stats.percentile_ms(50.0),
                stats.percentile_ms(95.0),
                stats.percentile_ms(99.0),
                stats.max_latency_ms()
            )?;
        }
        Ok(())
    }

    /// Convert to JSON object
    ///
    /// An infinite throughput serializes as `null`.
    pub fn to_json(&self, stats: &RunStats) -> serde_json::Value {
        serde_json::json!({
            "config": {
                "endpoint": self.config.endpoint,
                "workers": self.config.workers,
                "requests": self.config.requests,
                "event": self.config.event_name,
                "subject_id": self.config.subject_id,
            },
            "total": stats.total,
            "succeeded": stats.succeeded,
            "failed": stats.failed,
            "success_rate": stats.success_rate(),
            "elapsed_secs": stats.elapsed.as_secs_f64(),
            "throughput": stats.throughput(),
            "latency": {
                "mean_ms": stats.mean_latency_ms(),
                "p50_ms": stats.percentile_ms(50.0),
                "p95_ms": stats.percentile_ms(95.0),
                "p99_ms": stats.percentile_ms(99.0),
                "max_ms": stats.max_latency_ms()
            }
        })
    }

    /// CSV row matching [`CSV_HEADER`]
    pub fn csv_row(&self, stats: &RunStats) -> String {
        format!(
            "{},{},{},{:.2},{:.3},{},{:.3},{:.3},{:.3},{:.3},{:.3}",
            stats.total,
            stats.succeeded,
            stats.failed,
            stats.success_rate(),
            stats.elapsed.as_secs_f64(),
            format_rate(stats.throughput()),
            stats.mean_latency_ms(),
            stats.percentile_ms(50.0),
            stats.percentile_ms(95.0),
            stats.percentile_ms(99.0),
            stats.max_latency_ms()
        )
    }

    /// Write metrics to JSON file
    pub fn write_json(&self, path: &Path, stats: &RunStats) -> Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "{}", serde_json::to_string_pretty(&self.to_json(stats))?)?;
        Ok(())
    }

    /// Write metrics to CSV file
    pub fn write_csv(&self, path: &Path, stats: &RunStats) -> Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "{}", CSV_HEADER)?;
        writeln!(file, "{}", self.csv_row(stats))?;
        Ok(())
    }

    /// Export in the configured format, if an output path was given
    pub fn export(&self, stats: &RunStats) -> Result<()> {
        let Some(ref path) = self.config.output_path else {
            return Ok(());
        };
        match self.config.output_format {
            OutputFormat::Json => self.write_json(path, stats),
            OutputFormat::Csv => self.write_csv(path, stats),
        }
    }
}
