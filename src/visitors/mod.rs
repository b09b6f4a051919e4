//! Visit accounting.
//!
//! The counter is owned by the instance's shared state and handed by `Arc`
//! to the request handlers and the metrics exporter. Only `GET /` writes it.

pub mod counter;

pub use counter::VisitorCounter;
