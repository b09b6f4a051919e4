//! Periodic collection loop.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use url::Url;

use crate::collector::docker::DockerClient;
use crate::collector::metrics::CollectorMetrics;
use crate::collector::{endpoint, CollectorError};
use crate::config::CollectorConfig;
use crate::http::CountResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A webapp instance whose `/count` is polled.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub count_url: Url,
}

/// Outcome of one pass, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub containers: usize,
    pub targets: usize,
}

pub struct Collector {
    http: reqwest::Client,
    docker: Option<DockerClient>,
    targets: Vec<Target>,
    metrics: Arc<CollectorMetrics>,
    interval: Duration,
}

impl Collector {
    pub fn new(config: &CollectorConfig, metrics: Arc<CollectorMetrics>) -> Result<Self, CollectorError> {
        // Docker and the webapps are local; never route them through a proxy.
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()?;

        let docker = if config.docker_enabled {
            let base = parse_url(&config.docker_api_url)?;
            Some(DockerClient::new(http.clone(), base))
        } else {
            None
        };

        let targets = config
            .targets
            .iter()
            .map(|target| -> Result<Target, CollectorError> {
                let base = parse_url(&target.base_url)?;
                Ok(Target {
                    name: target.name.clone(),
                    count_url: endpoint(&base, &["count"])?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            http,
            docker,
            targets,
            metrics,
            interval: Duration::from_secs(config.interval_secs),
        })
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Collect on every tick until `shutdown` resolves. The first pass runs
    /// immediately.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            targets = self.targets.len(),
            docker = self.docker.is_some(),
            "Collector starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = self.collect_once().await;
                    tracing::debug!(
                        containers = summary.containers,
                        targets = summary.targets,
                        "Collection pass complete"
                    );
                }
                _ = &mut shutdown => {
                    tracing::info!("Collector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One pass: container stats (if enabled), then visitor counts.
    ///
    /// Failures are logged per container or target and never abort the pass.
    pub async fn collect_once(&self) -> CollectionSummary {
        let containers = match &self.docker {
            Some(docker) => self.collect_containers(docker).await,
            None => 0,
        };

        let mut targets = 0;
        for target in &self.targets {
            match self.fetch_count(target).await {
                Ok(count) => {
                    self.metrics.record_visitors(&target.name, count);
                    tracing::info!(container = %target.name, visitor_count = count, "Visitor count collected");
                    targets += 1;
                }
                Err(e) => {
                    tracing::warn!(container = %target.name, error = %e, "Failed to fetch visitor count");
                }
            }
        }

        CollectionSummary { containers, targets }
    }

    async fn collect_containers(&self, docker: &DockerClient) -> usize {
        let containers = match docker.list_containers().await {
            Ok(containers) => containers,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list containers");
                return 0;
            }
        };

        let wanted: HashSet<&str> = self.targets.iter().map(|t| t.name.as_str()).collect();
        let mut collected = 0;

        for container in &containers {
            let Some(name) = container.name().filter(|name| wanted.contains(name)) else {
                continue;
            };

            match docker.stats(&container.id).await {
                Ok(stats) => {
                    self.metrics
                        .record_container(name, stats.cpu_seconds(), stats.memory_bytes());
                    tracing::info!(
                        container = name,
                        cpu_seconds = stats.cpu_seconds(),
                        memory_bytes = stats.memory_bytes(),
                        "Container stats collected"
                    );
                    collected += 1;
                }
                Err(e) => {
                    tracing::warn!(container = name, error = %e, "Failed to fetch container stats");
                }
            }
        }

        collected
    }

    pub async fn fetch_count(&self, target: &Target) -> Result<u64, CollectorError> {
        let body: CountResponse = self
            .http
            .get(target.count_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.visitor_count)
    }
}

fn parse_url(value: &str) -> Result<Url, CollectorError> {
    Url::parse(value).map_err(|source| CollectorError::Url {
        value: value.to_string(),
        source,
    })
}
