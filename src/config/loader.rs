//! Configuration structures and loading logic.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

/// Output and selection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Requested stream quality, e.g. "720p".
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Custom base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Expand each URL to every episode of its franchise.
    #[serde(default)]
    pub all_episodes: bool,

    /// Disable the live progress display.
    #[serde(default)]
    pub disable_ui: bool,
}

/// Segment download tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum concurrent segment downloads.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            download_directory: None,
            all_episodes: false,
            disable_ui: false,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

fn default_resolution() -> String {
    "720p".to_string()
}

fn default_max_workers() -> usize {
    8
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(config.options.resolution, "720p");
        assert_eq!(config.download.max_workers, 8);
        assert!(!config.options.all_episodes);
        assert!(!config.options.disable_ui);
        assert!(config.options.download_directory.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [options]
            resolution = "1080p"
            "#,
        )
        .unwrap();

        assert_eq!(config.options.resolution, "1080p");
        assert_eq!(config.download.max_workers, 8);
    }
}
