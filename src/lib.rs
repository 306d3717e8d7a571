//! Hanime Downloader - episode download engine for hanime.tv
//!
//! This library downloads a segmented, AES-128-CBC encrypted HLS stream and
//! reassembles it into a single playable file.
//!
//! # Features
//!
//! - Guest-accessible stream variant selection with quality fallback
//! - M3U8 manifest and decryption key resolution
//! - Concurrent segment fetching with retry and exponential backoff
//! - In-order reassembly that tolerates missing segments
//! - Batch downloads and whole-franchise expansion
//!
//! # Example
//!
//! ```no_run
//! use hanime_downloader::{api::HanimeApi, config::Config, download, output::Reporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let api = HanimeApi::new()?;
//!     let reporter = Reporter::new(false);
//!     let mut stats = download::RunStats::default();
//!
//!     download::download_episode(
//!         &api,
//!         &config,
//!         &reporter,
//!         &mut stats,
//!         "https://hanime.tv/videos/hentai/some-episode-1",
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;

// Re-exports for convenience
pub use api::HanimeApi;
pub use config::Config;
pub use download::{download_episode, RunStats};
pub use error::{Error, Result};
