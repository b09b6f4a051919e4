//! Metrics collection and exposition.
//!
//! # Metrics
//! - `<instance>_visitors_total` (counter): visits to `GET /`
//!
//! # Design Decisions
//! - Each instance builds its own Prometheus recorder instead of installing a
//!   global one, so two instances in one process never share series
//! - The exported counter is synced from [`VisitorCounter`] at scrape time;
//!   scraping never writes the visitor count itself

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use metrics::Counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::visitors::VisitorCounter;

/// Prometheus text exposition format, version 0.0.4.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Something that can render itself in the Prometheus text format.
pub trait Exposition: Send + Sync + 'static {
    fn render(&self) -> String;
}

/// Exports one instance's visitor counter.
pub struct VisitorMetrics {
    handle: PrometheusHandle,
    visitors_total: Counter,
    visitors: Arc<VisitorCounter>,
    metric_name: String,
}

impl VisitorMetrics {
    pub fn new(instance: &str, visitors: Arc<VisitorCounter>) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let metric_name = format!("{}_visitors_total", instance);

        let visitors_total = metrics::with_local_recorder(&recorder, || {
            metrics::describe_counter!(
                metric_name.clone(),
                format!("Total number of visitors to {}", instance)
            );
            metrics::counter!(metric_name.clone())
        });

        Self {
            handle,
            visitors_total,
            visitors,
            metric_name,
        }
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }
}

impl Exposition for VisitorMetrics {
    fn render(&self) -> String {
        self.visitors_total.absolute(self.visitors.current());
        self.handle.render()
    }
}

/// Router serving an exposition on `/metrics` and `/`.
pub fn router<E: Exposition>(exposition: Arc<E>) -> Router {
    Router::new()
        .route("/metrics", get(scrape::<E>))
        .route("/", get(scrape::<E>))
        .with_state(exposition)
}

async fn scrape<E: Exposition>(State(exposition): State<Arc<E>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        exposition.render(),
    )
}
