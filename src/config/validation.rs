//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (load bounds, block sizes)
//! - Check addresses parse and do not collide
//! - Check the instance name can prefix a Prometheus metric
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{CollectorConfig, WebappConfig};
use crate::load::MIB;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("instance name {0:?} is not a valid metric name prefix")]
    InvalidInstanceName(String),

    #[error("instance greeting must not be empty")]
    EmptyGreeting,

    #[error("{field}: {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("application and metrics listeners both use {0}")]
    AddressConflict(SocketAddr),

    #[error("load.min_busy_ms ({min}) exceeds load.max_busy_ms ({max})")]
    BusyRange { min: u64, max: u64 },

    #[error("load block range {min}..={max} MiB is invalid (minimum is 1 MiB)")]
    BlockRange { min: usize, max: usize },

    #[error("load.max_block_mib ({0}) is too large to allocate")]
    BlockTooLarge(usize),

    #[error("collector interval must be at least one second")]
    ZeroInterval,

    #[error("{field}: {value:?} is not a valid URL")]
    InvalidUrl { field: String, value: String },

    #[error("collector has no targets")]
    NoTargets,
}

/// Validate a webapp instance configuration.
pub fn validate_config(config: &WebappConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_metric_prefix(&config.instance.name) {
        errors.push(ValidationError::InvalidInstanceName(
            config.instance.name.clone(),
        ));
    }
    if config.instance.greeting.is_empty() {
        errors.push(ValidationError::EmptyGreeting);
    }

    let app_addr = parse_addr("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        let metrics_addr = parse_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
        if let (Some(app), Some(metrics)) = (app_addr, metrics_addr) {
            if listeners_collide(app, metrics) {
                errors.push(ValidationError::AddressConflict(metrics));
            }
        }
    }

    let load = &config.load;
    if load.min_busy_ms > load.max_busy_ms {
        errors.push(ValidationError::BusyRange {
            min: load.min_busy_ms,
            max: load.max_busy_ms,
        });
    }
    if load.min_block_mib == 0 || load.min_block_mib > load.max_block_mib {
        errors.push(ValidationError::BlockRange {
            min: load.min_block_mib,
            max: load.max_block_mib,
        });
    }
    if load.max_block_mib.checked_mul(MIB).is_none() {
        errors.push(ValidationError::BlockTooLarge(load.max_block_mib));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a collector configuration.
pub fn validate_collector_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    parse_addr("metrics_address", &config.metrics_address, &mut errors);
    if config.docker_enabled {
        check_url("docker_api_url".to_string(), &config.docker_api_url, &mut errors);
    }
    if config.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
    }
    for target in &config.targets {
        check_url(format!("targets.{}.base_url", target.name), &target.base_url, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_addr(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

// A wildcard address claims the port on every interface.
fn listeners_collide(a: SocketAddr, b: SocketAddr) -> bool {
    a.port() == b.port()
        && a.port() != 0
        && (a.ip() == b.ip() || a.ip().is_unspecified() || b.ip().is_unspecified())
}

fn check_url(field: String, value: &str, errors: &mut Vec<ValidationError>) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

// Prometheus metric names: [a-zA-Z_:][a-zA-Z0-9_:]*. Colons are reserved for
// recording rules, so they are rejected here.
fn is_metric_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
