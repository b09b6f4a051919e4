use std::time::Instant;

use clap::{Parser, Subcommand};
use futures_util::stream::{self, StreamExt};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "webapp-cli")]
#[command(about = "Drive visits against a webapp instance and inspect its counters", long_about = None)]
struct Cli {
    /// Application listener of the instance
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Metrics listener of the instance
    #[arg(short, long, default_value = "http://localhost:5001")]
    metrics_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue visits to GET /
    Visit {
        /// Total number of visits
        #[arg(short = 'n', long, default_value_t = 10)]
        requests: usize,

        /// Visits in flight at once
        #[arg(short, long, default_value_t = 1)]
        concurrency: usize,
    },
    /// Print the current visitor count
    Count,
    /// Print the metrics exposition
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().no_proxy().build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Visit {
            requests,
            concurrency,
        } => {
            let url = format!("{}/", base);
            let start = Instant::now();

            let succeeded = stream::iter(0..requests)
                .map(|_| {
                    let client = client.clone();
                    let url = url.clone();
                    async move {
                        match client.get(&url).send().await {
                            Ok(res) => res.status().is_success(),
                            Err(e) => {
                                eprintln!("Visit failed: {}", e);
                                false
                            }
                        }
                    }
                })
                .buffer_unordered(concurrency.max(1))
                .filter(|ok| std::future::ready(*ok))
                .count()
                .await;

            println!(
                "{}/{} visits succeeded in {:.2?}",
                succeeded,
                requests,
                start.elapsed()
            );
        }
        Commands::Count => {
            if let Some(res) = get_success(&client, base, "/count").await? {
                let json: Value = res.json().await?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Metrics => {
            let metrics_base = cli.metrics_url.trim_end_matches('/');
            if let Some(res) = get_success(&client, metrics_base, "/metrics").await? {
                print!("{}", res.text().await?);
            }
        }
    }

    Ok(())
}

/// GET `base` + `path`. A non-success status is reported and yields `None`.
async fn get_success(
    client: &reqwest::Client,
    base: &str,
    path: &str,
) -> Result<Option<reqwest::Response>, reqwest::Error> {
    let res = client.get(format!("{}{}", base, path)).send().await?;
    if !res.status().is_success() {
        eprintln!("Error: {} returned status {}", path, res.status());
        return Ok(None);
    }
    Ok(Some(res))
}
