//! Visitor webapp instance.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 WEBAPP INSTANCE              │
//!                         │                                              │
//!     GET /               │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!     ────────────────────┼─▶│   http   │──▶│   load    │──▶│ visitors │ │
//!                         │  │  server  │   │ simulator │   │ counter  │ │
//!     GET /count          │  │          │   └───────────┘   │          │ │
//!     ────────────────────┼─▶│          │──────────────────▶│          │ │
//!                         │  └──────────┘                   └────┬─────┘ │
//!                         │                                      │       │
//!     GET /metrics        │  ┌────────────────────────┐          │       │
//!     (metrics port)  ────┼─▶│ observability::metrics │◀─────────┘       │
//!                         │  └────────────────────────┘                  │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use visitor_webapp::config::{load_config, Instance, WebappConfig};
use visitor_webapp::lifecycle::{self, signals::shutdown_signal};
use visitor_webapp::observability::logging;

#[derive(Parser)]
#[command(name = "webapp")]
#[command(about = "Demonstration webapp that counts visits and simulates load", long_about = None)]
struct Cli {
    /// Preset identity and ports, used when no config file is given
    #[arg(short, long, value_enum, default_value_t = Instance::Webapp1)]
    instance: Instance,

    /// TOML configuration file, used instead of a preset
    #[arg(short, long, conflicts_with = "instance")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WebappConfig::for_instance(cli.instance),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        instance = %config.instance.name,
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        metrics_enabled = config.observability.metrics_enabled,
        metrics_address = %config.observability.metrics_address,
        "webapp v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let running = lifecycle::start(config).await?;

    shutdown_signal().await;
    running.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
