//! API response type definitions.

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Video metadata response from the `/video` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub hentai_video: HentaiVideo,
    pub hentai_franchise: Franchise,
    #[serde(default)]
    pub hentai_franchise_hentai_videos: Vec<FranchiseEpisode>,
    pub videos_manifest: VideosManifest,
}

impl VideoInfo {
    /// Human-readable franchise title used for the download directory.
    pub fn title(&self) -> &str {
        &self.hentai_franchise.title
    }

    /// The stream variant catalog, in the server's declared quality order.
    pub fn streams(&self) -> Result<&[StreamVariant]> {
        self.videos_manifest
            .servers
            .first()
            .map(|server| server.streams.as_slice())
            .ok_or_else(|| Error::Api("No stream servers in video manifest".into()))
    }

    /// Slugs for every episode of the franchise, in release order.
    pub fn franchise_slugs(&self) -> Vec<String> {
        self.hentai_franchise_hentai_videos
            .iter()
            .map(|episode| episode.slug.clone())
            .collect()
    }
}

/// The episode the queried page belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct HentaiVideo {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// Franchise (series) metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Franchise {
    pub title: String,
}

/// A sibling episode of the same franchise.
#[derive(Debug, Clone, Deserialize)]
pub struct FranchiseEpisode {
    pub id: u64,
    pub slug: String,
}

/// Container for the per-server stream catalogs.
#[derive(Debug, Clone, Deserialize)]
pub struct VideosManifest {
    #[serde(default)]
    pub servers: Vec<Server>,
}

/// One hosting server and its stream variants.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub streams: Vec<StreamVariant>,
}

/// A single stream variant from the catalog.
///
/// The API reports `height` as a string ("1080"); it is normalized to a
/// number on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamVariant {
    #[serde(deserialize_with = "u32_from_string_or_number")]
    pub height: u32,
    pub url: String,
    #[serde(default)]
    pub is_guest_allowed: bool,
}

fn u32_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
