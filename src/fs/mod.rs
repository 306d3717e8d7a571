//! Filesystem helpers.

pub mod paths;

pub use paths::{create_download_directory, episode_filename, sanitize_directory_name};
