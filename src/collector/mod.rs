//! Monitoring collector.
//!
//! # Data Flow
//! ```text
//! every interval:
//!     docker.rs  → GET /containers/json, GET /containers/{id}/stats
//!                → container_cpu_usage_seconds_total, container_memory_usage_bytes
//!     poller.rs  → GET {target}/count
//!                → webapp_visitor_count
//! metrics.rs     → rendered on the collector's own /metrics
//! ```
//!
//! # Design Decisions
//! - One failing container or target never aborts a pass
//! - Gauges keep their last value when a later fetch fails

pub mod docker;
pub mod metrics;
pub mod poller;

use thiserror::Error;
use url::Url;

pub use self::metrics::CollectorMetrics;
pub use poller::{CollectionSummary, Collector, Target};

/// Errors raised while collecting.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL {value:?}: {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} cannot be used as a base URL")]
    BaseUrl(Url),
}

/// `base` with `segments` appended to its path.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CollectorError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CollectorError::BaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
