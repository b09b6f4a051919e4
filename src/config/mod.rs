//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or Instance preset
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WebappConfig / CollectorConfig (validated, immutable)
//!     → handed to lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_collector_config, load_config, ConfigError};
pub use schema::{
    CollectorConfig, Instance, InstanceConfig, ListenerConfig, LoadConfig, ObservabilityConfig,
    TargetConfig, WebappConfig,
};
pub use validation::ValidationError;
