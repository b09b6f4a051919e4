//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the instance's counter, load simulator and metrics exporter
//! - Bind the metrics listener, then the application listener
//! - Spawn both servers under one [`Shutdown`]
//!
//! # Design Decisions
//! - Fail fast: any bind error is fatal
//! - Every instance owns its own counter and recorder, nothing global
//! - Bound addresses are reported back, so port 0 works in tests

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, WebappConfig};
use crate::http::{serve, AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{self, VisitorMetrics};
use crate::visitors::VisitorCounter;

/// Errors that prevent an instance from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// A started instance. Dropping it does not stop the servers; call
/// [`RunningInstance::stop`].
pub struct RunningInstance {
    name: String,
    app_addr: SocketAddr,
    metrics_addr: Option<SocketAddr>,
    visitors: Arc<VisitorCounter>,
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<io::Result<()>>>,
}

/// Start one webapp instance.
pub async fn start(config: WebappConfig) -> Result<RunningInstance, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let visitors = Arc::new(VisitorCounter::new());
    let shutdown = Shutdown::new();
    let mut tasks = Vec::new();

    let metrics_addr = if config.observability.metrics_enabled {
        let exporter = Arc::new(VisitorMetrics::new(&config.instance.name, visitors.clone()));
        let listener = bind(&config.observability.metrics_address).await?;
        let addr = local_addr(&listener, &config.observability.metrics_address)?;

        tracing::info!(
            instance = %config.instance.name,
            address = %addr,
            metric = exporter.metric_name(),
            "Metrics exposition enabled"
        );

        tasks.push(tokio::spawn(serve(
            listener,
            metrics::router(exporter),
            shutdown.signal(),
            "metrics",
        )));
        Some(addr)
    } else {
        tracing::info!(instance = %config.instance.name, "Metrics exposition disabled");
        None
    };

    let listener = bind(&config.listener.bind_address).await?;
    let app_addr = local_addr(&listener, &config.listener.bind_address)?;

    tracing::info!(
        instance = %config.instance.name,
        address = %app_addr,
        min_busy_ms = config.load.min_busy_ms,
        max_busy_ms = config.load.max_busy_ms,
        min_block_mib = config.load.min_block_mib,
        max_block_mib = config.load.max_block_mib,
        load_enabled = config.load.enabled,
        "Instance listening"
    );

    let server = HttpServer::new(AppState::new(&config, visitors.clone()));
    tasks.push(tokio::spawn(server.run(listener, shutdown.signal())));

    Ok(RunningInstance {
        name: config.instance.name,
        app_addr,
        metrics_addr,
        visitors,
        shutdown,
        tasks,
    })
}

impl RunningInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of the application listener (`/` and `/count`).
    pub fn app_addr(&self) -> SocketAddr {
        self.app_addr
    }

    /// Address of the metrics listener, if enabled.
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_addr
    }

    pub fn visitors(&self) -> &Arc<VisitorCounter> {
        &self.visitors
    }

    /// Stop both servers and wait for them to drain.
    pub async fn stop(self) -> io::Result<()> {
        self.shutdown.trigger();
        for task in self.tasks {
            task.await.map_err(io::Error::other)??;
        }
        tracing::info!(instance = %self.name, "Instance stopped");
        Ok(())
    }
}

async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })
}

fn local_addr(listener: &TcpListener, address: &str) -> Result<SocketAddr, StartupError> {
    listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })
}
