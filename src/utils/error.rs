//! Error types for capture-bench

use std::io;
use thiserror::Error;

/// Top-level application error
///
/// Only setup-time failures and broken worker threads end up here.
/// Individual submission failures are counted, never propagated.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Histogram error: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worker error: {0}")]
    Worker(String),
}

/// Errors raised by the event submission client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Capture endpoint returned HTTP {0}")]
    Status(u16),
}

pub type Result<T> = std::result::Result<T, BenchError>;
