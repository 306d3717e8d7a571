//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_resolution(&config.options.resolution)?;
    validate_max_workers(config.download.max_workers)?;

    Ok(())
}

/// Validate the resolution preference shape.
pub fn validate_resolution(resolution: &str) -> Result<()> {
    let pattern = Regex::new(r"^\d{3,4}p$").unwrap();

    if !pattern.is_match(resolution.trim()) {
        return Err(Error::ConfigValidation {
            field: "resolution".to_string(),
            message: format!("'{}' is not a quality label like '720p'", resolution),
        });
    }

    Ok(())
}

/// Validate the segment worker count.
pub fn validate_max_workers(max_workers: usize) -> Result<()> {
    if max_workers == 0 {
        return Err(Error::ConfigValidation {
            field: "max_workers".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    Ok(())
}
