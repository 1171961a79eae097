//! Configuration module

pub mod bench_config;
pub mod cli;

pub use bench_config::{mask_api_key, BenchConfig};
pub use cli::{CliArgs, OutputFormat, MAX_WORKERS};
