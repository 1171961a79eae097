//! Final run statistics
//!
//! Rates are defined for every input: an empty run reports a 0% success
//! rate and 0 req/s, and a non-empty run that took no measurable time
//! reports an infinite throughput instead of dividing by zero.

use std::time::Duration;

use hdrhistogram::Histogram;

use crate::utils::Result;

/// Latency histogram bounds: 1us to 1 hour, 3 significant digits
pub const HISTOGRAM_MAX_US: u64 = 3_600_000_000;
pub const HISTOGRAM_SIGFIG: u8 = 3;

/// Create an empty latency histogram (microseconds)
pub fn latency_histogram() -> Result<Histogram<u64>> {
    Ok(Histogram::new_with_bounds(1, HISTOGRAM_MAX_US, HISTOGRAM_SIGFIG)?)
}

/// Immutable snapshot of a completed run
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Outcomes observed
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Wall-clock time from dispatch start to drain
    pub elapsed: Duration,
    /// Submission latencies in microseconds
    pub histogram: Histogram<u64>,
}

impl RunStats {
    /// Success rate in percent (0.0 for an empty run)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }

    /// Average throughput in requests per second
    ///
    /// 0.0 for an empty run, `f64::INFINITY` when work finished in no
    /// measurable time.
    pub fn throughput(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            f64::INFINITY
        }
    }

    /// Get percentile latency in milliseconds
    pub fn percentile_ms(&self, p: f64) -> f64 {
        if self.histogram.is_empty() {
            return 0.0;
        }
        self.histogram.value_at_percentile(p) as f64 / 1000.0
    }

    /// Mean latency in milliseconds
    pub fn mean_latency_ms(&self) -> f64 {
        if self.histogram.is_empty() {
            return 0.0;
        }
        self.histogram.mean() / 1000.0
    }

    /// Max latency in milliseconds
    pub fn max_latency_ms(&self) -> f64 {
        self.histogram.max() as f64 / 1000.0
    }
}

/// Format a rate, rendering the "immeasurably fast" case as `inf`
pub fn format_rate(rate: f64) -> String {
    if rate.is_finite() {
        format!("{:.2}", rate)
    } else {
        "inf".to_string()
    }
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(succeeded: u64, failed: u64, elapsed: Duration) -> RunStats {
        RunStats {
            total: succeeded + failed,
            succeeded,
            failed,
            elapsed,
            histogram: latency_histogram().unwrap(),
        }
    }

    #[test]
    fn test_empty_run_rates() {
        let s = stats(0, 0, Duration::ZERO);
        assert_eq!(s.success_rate(), 0.0);
        assert_eq!(s.throughput(), 0.0);
        assert_eq!(s.mean_latency_ms(), 0.0);
        assert_eq!(s.percentile_ms(99.0), 0.0);
        assert_eq!(s.succeeded + s.failed, s.total);
    }

    #[test]
    fn test_rates() {
        let s = stats(3, 1, Duration::from_secs(2));
        assert!((s.success_rate() - 75.0).abs() < 1e-9);
        assert!((s.throughput() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_elapsed_is_infinite() {
        let s = stats(5, 0, Duration::ZERO);
        assert!(s.throughput().is_infinite());
        assert_eq!(format_rate(s.throughput()), "inf");
    }

    #[test]
    fn test_percentiles() {
        let mut s = stats(110, 0, Duration::from_secs(1));
        for _ in 0..100 {
            s.histogram.record(1000).unwrap(); // 1ms
        }
        for _ in 0..10 {
            s.histogram.record(10000).unwrap(); // 10ms
        }

        assert!(s.percentile_ms(50.0) < 2.0);
        assert!(s.percentile_ms(99.0) > 9.0);
        assert!(s.max_latency_ms() > 9.0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0.00");
        assert_eq!(format_rate(1234.5678), "1234.57");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(123), "123");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
