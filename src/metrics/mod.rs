//! Metrics and reporting
//!
//! - RunStats: final statistics snapshot with guarded rate math
//! - MetricsReporter: console summary plus JSON/CSV export

pub mod reporter;
pub mod stats;

pub use reporter::MetricsReporter;
pub use stats::{format_count, format_rate, latency_histogram, RunStats};
