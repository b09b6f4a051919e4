//! Configuration schema definitions.
//!
//! This module defines the configuration structures for a webapp instance and
//! for the monitoring collector. All types derive Serde traits for
//! deserialization from TOML files.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The two demonstration instances shipped with the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Instance {
    Webapp1,
    Webapp2,
}

impl Instance {
    /// Identity used in logs and as the metric name prefix.
    pub fn name(self) -> &'static str {
        match self {
            Instance::Webapp1 => "webapp1",
            Instance::Webapp2 => "webapp2",
        }
    }

    /// Fixed (application, metrics) port pair for this instance.
    pub fn ports(self) -> (u16, u16) {
        match self {
            Instance::Webapp1 => (8081, 5001),
            Instance::Webapp2 => (8082, 5002),
        }
    }

    fn greeting(self) -> &'static str {
        match self {
            Instance::Webapp1 => "Hello from Webapp1! ",
            Instance::Webapp2 => "Hello from Webapp2! ",
        }
    }
}

/// Root configuration for one webapp instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebappConfig {
    /// Instance identity.
    pub instance: InstanceConfig,

    /// Application listener.
    pub listener: ListenerConfig,

    /// Logging and metrics exposition.
    pub observability: ObservabilityConfig,

    /// Per-visit synthetic load.
    pub load: LoadConfig,
}

impl WebappConfig {
    /// Preset configuration for one of the two demonstration instances.
    pub fn for_instance(instance: Instance) -> Self {
        let (app_port, metrics_port) = instance.ports();
        Self {
            instance: InstanceConfig {
                name: instance.name().to_string(),
                greeting: instance.greeting().to_string(),
            },
            listener: ListenerConfig {
                bind_address: format!("0.0.0.0:{}", app_port),
            },
            observability: ObservabilityConfig {
                metrics_address: format!("0.0.0.0:{}", metrics_port),
                ..ObservabilityConfig::default()
            },
            load: LoadConfig::default(),
        }
    }
}

impl Default for WebappConfig {
    fn default() -> Self {
        Self::for_instance(Instance::Webapp1)
    }
}

/// Instance identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Short instance name, e.g. "webapp1". Prefixes the visitor metric.
    pub name: String,

    /// Body returned by `GET /`.
    pub greeting: String,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: Instance::Webapp1.name().to_string(),
            greeting: Instance::Webapp1.greeting().to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:5001".to_string(),
        }
    }
}

/// Synthetic load drawn on every visit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Run the simulator at all. Disabling it keeps counting intact.
    pub enabled: bool,

    /// Lower bound of the busy-wait, in milliseconds (inclusive).
    pub min_busy_ms: u64,

    /// Upper bound of the busy-wait, in milliseconds (inclusive).
    pub max_busy_ms: u64,

    /// Smallest memory block, in MiB.
    pub min_block_mib: usize,

    /// Largest memory block, in MiB.
    pub max_block_mib: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_busy_ms: 100,
            max_busy_ms: 500,
            min_block_mib: 1,
            max_block_mib: 5,
        }
    }
}

/// Root configuration for the monitoring collector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Seconds between collection passes.
    pub interval_secs: u64,

    /// Poll container stats from the Docker Engine API.
    pub docker_enabled: bool,

    /// Docker Engine API base URL.
    pub docker_api_url: String,

    /// Bind address for the collector's own metrics endpoint.
    pub metrics_address: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Instances to scrape.
    pub targets: Vec<TargetConfig>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        let targets = [Instance::Webapp1, Instance::Webapp2]
            .into_iter()
            .map(|instance| TargetConfig {
                name: instance.name().to_string(),
                base_url: format!("http://localhost:{}", instance.ports().0),
            })
            .collect();

        Self {
            interval_secs: 15,
            docker_enabled: true,
            docker_api_url: "http://localhost:2375".to_string(),
            metrics_address: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            targets,
        }
    }
}

/// A webapp instance watched by the collector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Container name, used as the `container_name` label.
    pub name: String,

    /// Base URL of the instance's application listener.
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_presets() {
        let a = WebappConfig::for_instance(Instance::Webapp1);
        assert_eq!(a.instance.name, "webapp1");
        assert_eq!(a.instance.greeting, "Hello from Webapp1! ");
        assert_eq!(a.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(a.observability.metrics_address, "0.0.0.0:5001");

        let b = WebappConfig::for_instance(Instance::Webapp2);
        assert_eq!(b.instance.name, "webapp2");
        assert_eq!(b.listener.bind_address, "0.0.0.0:8082");
        assert_eq!(b.observability.metrics_address, "0.0.0.0:5002");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WebappConfig = toml::from_str(
            r#"
            [load]
            max_busy_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.load.min_busy_ms, 100);
        assert_eq!(config.load.max_busy_ms, 250);
        assert_eq!(config.instance.name, "webapp1");
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_collector_defaults_target_both_instances() {
        let config = CollectorConfig::default();
        let urls: Vec<_> = config.targets.iter().map(|t| t.base_url.as_str()).collect();
        assert_eq!(urls, ["http://localhost:8081", "http://localhost:8082"]);
        assert_eq!(config.interval_secs, 15);
    }
}
