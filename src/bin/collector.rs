//! Monitoring collector: polls webapp instances (and Docker) and re-exports
//! what it sees as Prometheus gauges.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use visitor_webapp::collector::{Collector, CollectorMetrics};
use visitor_webapp::config::{load_collector_config, CollectorConfig};
use visitor_webapp::http::serve;
use visitor_webapp::lifecycle::{signals::shutdown_signal, Shutdown};
use visitor_webapp::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Polls webapp visitor counts and container stats for Prometheus", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip Docker container stats
    #[arg(long)]
    no_docker: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_collector_config(path)?,
        None => CollectorConfig::default(),
    };
    if cli.no_docker {
        config.docker_enabled = false;
    }

    logging::init(&config.log_level);

    let exporter = Arc::new(CollectorMetrics::new());
    let collector = Collector::new(&config, exporter.clone())?;
    let shutdown = Shutdown::new();

    let listener = TcpListener::bind(&config.metrics_address).await?;
    let server = tokio::spawn(serve(
        listener,
        metrics::router(exporter),
        shutdown.signal(),
        "collector-metrics",
    ));
    let poller = tokio::spawn(collector.run(shutdown.signal()));

    shutdown_signal().await;
    shutdown.trigger();

    poller.await?;
    server.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
