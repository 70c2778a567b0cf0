//! Configuration - Planner constants and the built-in catalogues, from TOML

mod constants;
mod roster;

pub use constants::{
    AttributeConstants, CritConstants, DefenseConstants, FallbackConstants, PlannerConstants,
    SetConstants,
};
pub use roster::{
    default_roster, default_weapons, load_roster, load_weapons, parse_roster, parse_weapons,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid planner constants: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Deserialize TOML text, e.g. an embedded catalogue
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load planner constants from a TOML file and validate them
pub fn load_constants(path: &Path) -> Result<PlannerConstants, ConfigError> {
    let constants: PlannerConstants = load_toml(path)?;
    constants.validate()?;
    Ok(constants)
}
