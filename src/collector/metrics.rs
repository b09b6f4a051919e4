//! Gauges published by the collector.
//!
//! # Metrics
//! - `container_cpu_usage_seconds_total{container_name}` (gauge)
//! - `container_memory_usage_bytes{container_name}` (gauge)
//! - `webapp_visitor_count{container_name}` (gauge)

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use crate::observability::metrics::Exposition;

const CPU_USAGE: &str = "container_cpu_usage_seconds_total";
const MEMORY_USAGE: &str = "container_memory_usage_bytes";
const VISITOR_COUNT: &str = "webapp_visitor_count";

pub struct CollectorMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl CollectorMetrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_gauge!(CPU_USAGE, "Total CPU usage of containers");
            metrics::describe_gauge!(MEMORY_USAGE, "Memory usage of containers");
            metrics::describe_gauge!(VISITOR_COUNT, "Number of visitors to the webapp");
        });

        Self { recorder, handle }
    }

    pub fn record_container(&self, container: &str, cpu_seconds: f64, memory_bytes: f64) {
        let labels = [("container_name", container.to_string())];
        metrics::with_local_recorder(&self.recorder, || {
            metrics::gauge!(CPU_USAGE, &labels).set(cpu_seconds);
            metrics::gauge!(MEMORY_USAGE, &labels).set(memory_bytes);
        });
    }

    pub fn record_visitors(&self, container: &str, visitors: u64) {
        let labels = [("container_name", container.to_string())];
        metrics::with_local_recorder(&self.recorder, || {
            metrics::gauge!(VISITOR_COUNT, &labels).set(visitors as f64);
        });
    }
}

impl Default for CollectorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Exposition for CollectorMetrics {
    fn render(&self) -> String {
        self.handle.render()
    }
}
