//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use visitor_webapp::config::{Instance, LoadConfig, WebappConfig};
use visitor_webapp::http::CountResponse;
use visitor_webapp::lifecycle::{self, RunningInstance};

/// Preset config rebound to ephemeral localhost ports.
pub fn local_config(instance: Instance) -> WebappConfig {
    let mut config = WebappConfig::for_instance(instance);
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observability.metrics_address = "127.0.0.1:0".into();
    config
}

/// A few milliseconds of load per visit, for tests that count many visits.
pub fn quick_load() -> LoadConfig {
    LoadConfig {
        min_busy_ms: 2,
        max_busy_ms: 10,
        ..LoadConfig::default()
    }
}

pub async fn start(config: WebappConfig) -> RunningInstance {
    lifecycle::start(config).await.expect("instance should start")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub async fn visit(client: &reqwest::Client, addr: SocketAddr) -> String {
    let res = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .expect("instance unreachable");
    assert_eq!(res.status(), 200);
    res.text().await.unwrap()
}

pub async fn count(client: &reqwest::Client, addr: SocketAddr) -> u64 {
    let res = client
        .get(format!("http://{}/count", addr))
        .send()
        .await
        .expect("instance unreachable");
    assert_eq!(res.status(), 200);
    res.json::<CountResponse>().await.unwrap().visitor_count
}

pub async fn scrape(client: &reqwest::Client, addr: SocketAddr) -> String {
    let res = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("metrics unreachable");
    assert_eq!(res.status(), 200);
    res.text().await.unwrap()
}

/// Value of the first sample whose series starts with `series`.
pub fn sample(text: &str, series: &str) -> Option<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| line.strip_prefix(series)?.trim().parse().ok())
}

/// Container ids the mock Docker API was asked for stats about.
pub type StatsRequests = Arc<Mutex<Vec<String>>>;

/// Start a mock Docker Engine API.
///
/// Lists `webapp1` (id `aaa`), `webapp2` (id `bbb`) and `prometheus` (id
/// `ccc`). Stats for `aaa` report 2.5s of CPU and 8 MiB of memory; stats for
/// any other id fail with 500.
pub async fn start_mock_docker() -> (SocketAddr, StatsRequests) {
    let requests: StatsRequests = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/containers/json",
            get(|| async {
                Json(json!([
                    { "Id": "aaa", "Names": ["/webapp1"] },
                    { "Id": "bbb", "Names": ["/webapp2"] },
                    { "Id": "ccc", "Names": ["/prometheus"] },
                ]))
            }),
        )
        .route("/containers/{id}/stats", get(mock_stats))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, requests)
}

async fn mock_stats(
    State(requests): State<StatsRequests>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    requests.lock().unwrap().push(id.clone());
    if id == "aaa" {
        Json(json!({
            "cpu_stats": { "cpu_usage": { "total_usage": 2_500_000_000u64 } },
            "memory_stats": { "usage": 8_388_608u64 },
        }))
        .into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
