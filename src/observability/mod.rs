//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (visitor counter exposition)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, separate port)
//! ```

pub mod logging;
pub mod metrics;
