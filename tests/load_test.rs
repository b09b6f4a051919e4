//! Concurrent visits: exact counting and per-visit load under contention.

use std::time::{Duration, Instant};

use visitor_webapp::config::{Instance, LoadConfig};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fifty_concurrent_visits() {
    // Short spins keep the test fast; the bounds still prove load ran.
    let mut config = common::local_config(Instance::Webapp1);
    config.load = LoadConfig {
        min_busy_ms: 20,
        max_busy_ms: 40,
        ..LoadConfig::default()
    };
    let instance = common::start(config).await;
    let addr = instance.app_addr();

    let concurrency = 50;
    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let req_start = Instant::now();
            common::visit(&client, addr).await;
            req_start.elapsed()
        }));
    }

    let mut latencies = Vec::new();
    for task in tasks {
        latencies.push(task.await.unwrap());
    }
    let duration = start.elapsed();

    assert_eq!(common::count(&client, addr).await, concurrency as u64);
    assert_eq!(instance.visitors().current(), concurrency as u64);

    latencies.sort();
    assert!(latencies[0] >= Duration::from_millis(20));
    let p50 = latencies[latencies.len() / 2];
    let p95 = latencies[(latencies.len() as f64 * 0.95) as usize];

    println!("\n--- Visit Load Results ---");
    println!("Visits:         {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("--------------------------\n");

    instance.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_count_answers_while_visits_spin() {
    let mut config = common::local_config(Instance::Webapp1);
    config.load = LoadConfig {
        min_busy_ms: 400,
        max_busy_ms: 500,
        ..LoadConfig::default()
    };
    let instance = common::start(config).await;
    let addr = instance.app_addr();
    let client = common::client();

    // More spinning visits than async workers.
    let visits: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { common::visit(&client, addr).await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let start = Instant::now();
    let during = common::count(&client, addr).await;
    assert!(
        start.elapsed() < Duration::from_millis(300),
        "/count was blocked by visits for {:?}",
        start.elapsed()
    );
    assert_eq!(during, 0);

    for visit in visits {
        visit.await.unwrap();
    }
    assert_eq!(common::count(&client, addr).await, 4);

    instance.stop().await.unwrap();
}
