//! Hanime API module.
//!
//! This module provides:
//! - The HTTP client for metadata, playlists, keys, and segments
//! - serde types for the `/video` metadata response
//! - Episode page URL parsing

pub mod client;
pub mod types;
pub mod urls;

pub use client::HanimeApi;
pub use types::{StreamVariant, VideoInfo};
pub use urls::{extract_slug, page_url};
