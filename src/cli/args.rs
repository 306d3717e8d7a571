//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Hanime episode downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "hanime-downloader",
    version,
    about = "Download and decrypt episodes from hanime.tv",
    long_about = "A CLI tool to download hanime.tv episodes.\n\n\
                  Fetches the encrypted HLS stream for each episode page URL, decrypts the\n\
                  segments, and reassembles them into a single playable file."
)]
pub struct Args {
    /// Episode page URL(s) to download.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Read additional URLs from a newline-delimited file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Requested stream quality (e.g. "480p", "720p").
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Download every episode of each URL's franchise.
    #[arg(long)]
    pub all_episodes: bool,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Maximum concurrent segment downloads.
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Disable the live progress display.
    #[arg(long)]
    pub disable_ui: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(resolution) = &self.resolution {
            config.options.resolution = resolution.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(max_workers) = self.max_workers {
            config.download.max_workers = max_workers;
        }

        // Boolean flags (only override if set)
        if self.all_episodes {
            config.options.all_episodes = true;
        }

        if self.disable_ui {
            config.options.disable_ui = true;
        }
    }
}
