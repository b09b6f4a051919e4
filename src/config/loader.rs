//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::{CollectorConfig, WebappConfig};
use crate::config::validation::{validate_collector_config, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a webapp configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WebappConfig, ConfigError> {
    let config: WebappConfig = read_toml(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate a collector configuration from a TOML file.
pub fn load_collector_config(path: &Path) -> Result<CollectorConfig, ConfigError> {
    let config: CollectorConfig = read_toml(path)?;
    validate_collector_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
