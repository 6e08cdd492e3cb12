//! # Configuration System
//!
//! Centralized configuration for the Semgate semantic gateway.
//!
//! This crate provides:
//! - Configuration structures for every subsystem, with defaults carrying
//!   the reference operating values
//! - Environment variable loading (`SEMGATE_*`, 12-factor)
//! - Configuration file loading (TOML/YAML)
//! - Precedence: environment > file > defaults
//! - Validation; invalid configuration is fatal at load, never silently
//!   defaulted

pub mod config;
pub mod file_loader;
pub mod loader;

pub use config::{
    AdmissionSettings, CacheSettings, DefenseSettings, GenerationSettings, GoogleSettings,
    OpenAiSettings, ProviderSettings, SemgateConfig, SnapshotSettings,
};
pub use file_loader::{load_from_file, load_from_toml, load_from_yaml};
pub use loader::apply_env;
pub use validator::Validate;

use errors::ConfigError;
use std::path::Path;

/// Loads the effective configuration: defaults, overlaid by an optional
/// file, overlaid by environment variables, then validated.
pub fn load(path: Option<&Path>) -> Result<SemgateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => SemgateConfig::default(),
    };
    apply_env(&mut config)?;
    config.validate_strict()?;
    Ok(config)
}
