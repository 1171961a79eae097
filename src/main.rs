//! capture-bench - load generator for analytics event capture endpoints
//!
//! Submits a fixed number of events through a pool of concurrent workers
//! and reports throughput and success statistics.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use capture_bench::benchmark::Orchestrator;
use capture_bench::client::HttpCaptureClient;
use capture_bench::config::{BenchConfig, CliArgs};
use capture_bench::metrics::{format_count, MetricsReporter};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchConfig) {
    if config.quiet {
        return;
    }

    println!("capture-bench v{}", env!("CARGO_PKG_VERSION"));
    println!("----------------------------------------");
    println!("API key: {}", config.masked_api_key());
    println!("Endpoint: {}", config.endpoint);
    println!("Workers: {}", config.workers);
    println!("Requests: {}", format_count(config.requests));
    println!("Event: {}", config.event_name);
    println!("Subject: {}", config.subject_id);
    println!("----------------------------------------");
}

fn run() -> Result<()> {
    // Missing --key exits here with usage text
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    let config = BenchConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let client = HttpCaptureClient::from_config(&config)
        .context("Failed to create capture client")?;
    info!("Capture URL: {}", client.capture_url());

    print_banner(&config);

    let orchestrator = Orchestrator::new(config.clone(), Arc::new(client))?;
    let stats = orchestrator.run()?;

    let reporter = MetricsReporter::new(&config);
    reporter.print_console(&stats);

    if let Some(ref output_path) = config.output_path {
        info!("Writing results to: {:?}", output_path);
        reporter.export(&stats)?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
