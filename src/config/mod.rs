//! Configuration module.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Merging CLI argument overrides
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, DownloadConfig, OptionsConfig};
pub use validation::validate_config;
