//! Load simulation subsystem.
//!
//! # Data Flow
//! ```text
//! GET / (blocking thread)
//!     → profile.rs (draw busy time + block size)
//!     → simulator.rs (spin CPU, then allocate/fill/drop block)
//!     → LoadReport (logged by the handler)
//! ```
//!
//! # Design Decisions
//! - CPU phase is a real spin, not a sleep, so it shows up as CPU usage
//! - Memory is reserved fallibly; failure fails the visit, not the process
//! - Nothing is cached or pooled between visits

pub mod profile;
pub mod simulator;

pub use profile::{LoadProfile, MIB};
pub use simulator::{LoadError, LoadReport, LoadSimulator};
