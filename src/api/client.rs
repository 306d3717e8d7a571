//! Hanime API HTTP client.

use async_trait::async_trait;
use reqwest::Client;

use crate::api::types::VideoInfo;
use crate::download::SegmentSource;
use crate::error::{Error, Result};

/// Hanime API base URL.
const API_BASE: &str = "https://hanime.tv/api/v8";

/// Browser user agent sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client for the hanime.tv API and its CDN.
pub struct HanimeApi {
    client: Client,
}

impl HanimeApi {
    /// Create a new API client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch episode metadata (title, franchise, stream catalog) by slug.
    pub async fn get_video(&self, slug: &str) -> Result<VideoInfo> {
        let url = format!("{}/video?id={}", API_BASE, slug);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Api(format!("Metadata request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Metadata request for '{}' returned HTTP {}",
                slug, status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Api(format!("Failed to read metadata response: {}", e)))?;

        serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Failed to parse video info: {}", e)))
    }

    /// Fetch a URL as text (playlist bodies).
    pub async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch a URL as raw bytes (key material, segments).
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SegmentSource for HanimeApi {
    async fn fetch_segment(&self, uri: &str) -> Result<Vec<u8>> {
        self.get_bytes(uri).await
    }
}
