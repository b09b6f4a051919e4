//! End-to-end visit counting against real listeners.

use std::time::{Duration, Instant};

use visitor_webapp::config::Instance;

mod common;

#[tokio::test]
async fn test_single_visit_counts_one() {
    let instance = common::start(common::local_config(Instance::Webapp1)).await;
    let client = common::client();

    assert_eq!(common::count(&client, instance.app_addr()).await, 0);

    let start = Instant::now();
    let body = common::visit(&client, instance.app_addr()).await;
    let elapsed = start.elapsed();

    assert_eq!(body, "Hello from Webapp1! ");
    // The default profile spins for at least 100ms before answering.
    assert!(elapsed >= Duration::from_millis(100), "visit took {:?}", elapsed);

    let res = client
        .get(format!("http://{}/count", instance.app_addr()))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json, serde_json::json!({ "visitor_count": 1 }));

    instance.stop().await.unwrap();
}

#[tokio::test]
async fn test_ten_sequential_visits() {
    let mut config = common::local_config(Instance::Webapp1);
    config.load = common::quick_load();
    let instance = common::start(config).await;
    let client = common::client();

    for _ in 0..10 {
        common::visit(&client, instance.app_addr()).await;
    }

    assert_eq!(common::count(&client, instance.app_addr()).await, 10);
    instance.stop().await.unwrap();
}

#[tokio::test]
async fn test_metrics_after_three_visits() {
    let mut config = common::local_config(Instance::Webapp2);
    config.load = common::quick_load();
    let instance = common::start(config).await;
    let client = common::client();
    let metrics_addr = instance.metrics_addr().expect("metrics enabled by default");

    for _ in 0..3 {
        common::visit(&client, instance.app_addr()).await;
    }

    let text = common::scrape(&client, metrics_addr).await;
    assert!(text.contains("# TYPE webapp2_visitors_total counter"));
    assert_eq!(common::sample(&text, "webapp2_visitors_total"), Some(3.0));

    // Scraping is read-only.
    common::scrape(&client, metrics_addr).await;
    assert_eq!(common::count(&client, instance.app_addr()).await, 3);

    instance.stop().await.unwrap();
}

#[tokio::test]
async fn test_instances_are_independent() {
    let mut a_config = common::local_config(Instance::Webapp1);
    a_config.load = common::quick_load();
    let mut b_config = common::local_config(Instance::Webapp2);
    b_config.load = common::quick_load();

    let a = common::start(a_config).await;
    let b = common::start(b_config).await;
    let client = common::client();

    assert_eq!(common::visit(&client, b.app_addr()).await, "Hello from Webapp2! ");
    for _ in 0..2 {
        common::visit(&client, a.app_addr()).await;
    }

    assert_eq!(common::count(&client, a.app_addr()).await, 2);
    assert_eq!(common::count(&client, b.app_addr()).await, 1);

    let a_text = common::scrape(&client, a.metrics_addr().unwrap()).await;
    let b_text = common::scrape(&client, b.metrics_addr().unwrap()).await;
    assert_eq!(common::sample(&a_text, "webapp1_visitors_total"), Some(2.0));
    assert_eq!(common::sample(&b_text, "webapp2_visitors_total"), Some(1.0));
    assert!(!a_text.contains("webapp2_visitors_total"));
    assert!(!b_text.contains("webapp1_visitors_total"));

    a.stop().await.unwrap();
    b.stop().await.unwrap();
}

#[tokio::test]
async fn test_metrics_can_be_disabled() {
    let mut config = common::local_config(Instance::Webapp1);
    config.load = common::quick_load();
    config.observability.metrics_enabled = false;

    let instance = common::start(config).await;
    assert!(instance.metrics_addr().is_none());

    let client = common::client();
    common::visit(&client, instance.app_addr()).await;
    assert_eq!(instance.visitors().current(), 1);

    instance.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = common::local_config(Instance::Webapp1);
    config.load.min_busy_ms = 1_000;

    let err = visitor_webapp::lifecycle::start(config).await.err().unwrap();
    assert!(err.to_string().contains("load.min_busy_ms"));
}
