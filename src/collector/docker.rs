//! Docker Engine API client (container list and one-shot stats).

use serde::Deserialize;
use url::Url;

use crate::collector::{endpoint, CollectorError};

/// Entry of `GET /containers/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
}

impl ContainerSummary {
    /// First container name without Docker's leading slash.
    pub fn name(&self) -> Option<&str> {
        self.names
            .first()
            .map(|name| name.strip_prefix('/').unwrap_or(name))
    }
}

/// The parts of `GET /containers/{id}/stats` the collector reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerStats {
    pub cpu_stats: CpuStats,
    pub memory_stats: MemoryStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    /// Cumulative CPU time in nanoseconds.
    pub total_usage: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    /// Current memory usage in bytes.
    pub usage: f64,
}

impl ContainerStats {
    pub fn cpu_seconds(&self) -> f64 {
        self.cpu_stats.cpu_usage.total_usage / 1e9
    }

    pub fn memory_bytes(&self) -> f64 {
        self.memory_stats.usage
    }
}

pub struct DockerClient {
    http: reqwest::Client,
    base: Url,
}

impl DockerClient {
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    pub async fn list_containers(&self) -> Result<Vec<ContainerSummary>, CollectorError> {
        let url = endpoint(&self.base, &["containers", "json"])?;
        let containers = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(containers)
    }

    pub async fn stats(&self, id: &str) -> Result<ContainerStats, CollectorError> {
        let mut url = endpoint(&self.base, &["containers", id, "stats"])?;
        url.set_query(Some("stream=false"));

        let stats = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stats)
    }
}
