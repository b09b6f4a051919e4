//! Demonstration webapp for monitoring pipelines.
//!
//! Each instance counts visits to `GET /`, burns a random amount of CPU and
//! memory on every visit, and exposes the count on `GET /count` and on a
//! Prometheus metrics listener. A separate collector polls instances (and
//! optionally Docker) and re-exports what it sees.

// Core
pub mod load;
pub mod visitors;

// Serving
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

// Monitoring side
pub mod collector;

pub use config::{Instance, WebappConfig};
pub use http::HttpServer;
pub use lifecycle::{RunningInstance, Shutdown};
