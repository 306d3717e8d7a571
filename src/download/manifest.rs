//! Manifest and decryption key resolution.

use crate::api::{HanimeApi, StreamVariant};
use crate::crypto::{CipherContext, BLOCK_SIZE};
use crate::error::{Error, Result};

/// Decryption key reference declared in the playlist.
#[derive(Debug, Clone)]
pub struct ManifestKey {
    pub uri: String,
    pub iv: Option<[u8; BLOCK_SIZE]>,
}

/// Parsed segment manifest for one stream variant.
///
/// Segment order is load-bearing: the index in `segment_uris` determines the
/// byte position in the assembled file.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub segment_uris: Vec<String>,
    pub key: Option<ManifestKey>,
}

impl Manifest {
    /// The declared key, or the fatal keyless-stream error.
    pub fn require_key(&self) -> Result<&ManifestKey> {
        self.key.as_ref().ok_or(Error::MissingDecryptionKey)
    }
}

/// Fetch and parse the variant's segment manifest.
///
/// Issues a single request; a malformed or unreachable manifest aborts the
/// job immediately, unlike segment-level failures which are retried.
pub async fn resolve(api: &HanimeApi, variant: &StreamVariant) -> Result<Manifest> {
    let content = api
        .get_text(&variant.url)
        .await
        .map_err(|e| Error::ManifestFetch(e.to_string()))?;

    let manifest = parse_manifest(&variant.url, content.as_bytes())?;
    manifest.require_key()?;
    Ok(manifest)
}

/// Fetch the key material and build the shared cipher context.
pub async fn load_cipher(api: &HanimeApi, manifest: &Manifest) -> Result<CipherContext> {
    let key = manifest.require_key()?;
    let key_data = api
        .get_bytes(&key.uri)
        .await
        .map_err(|e| Error::ManifestFetch(format!("Key fetch failed: {}", e)))?;

    CipherContext::new(&key_data, key.iv)
}

/// Parse a media playlist into segment URIs and the first declared key.
pub(crate) fn parse_manifest(base_url: &str, content: &[u8]) -> Result<Manifest> {
    let playlist = m3u8_rs::parse_playlist_res(content)
        .map_err(|e| Error::ManifestFetch(format!("Failed to parse playlist: {:?}", e)))?;

    let media = match playlist {
        m3u8_rs::Playlist::MediaPlaylist(media) => media,
        m3u8_rs::Playlist::MasterPlaylist(_) => {
            return Err(Error::ManifestFetch(
                "Expected media playlist, got master playlist".into(),
            ));
        }
    };

    let segment_uris = media
        .segments
        .iter()
        .map(|segment| resolve_uri(base_url, &segment.uri))
        .collect::<Result<Vec<_>>>()?;

    if segment_uris.is_empty() {
        return Err(Error::ManifestFetch("No segments found in playlist".into()));
    }

    let key = media
        .segments
        .iter()
        .find_map(|segment| segment.key.as_ref())
        .and_then(|key| {
            key.uri.as_ref().map(|uri| -> Result<ManifestKey> {
                Ok(ManifestKey {
                    uri: resolve_uri(base_url, uri)?,
                    iv: key.iv.as_deref().and_then(parse_iv),
                })
            })
        })
        .transpose()?;

    Ok(Manifest { segment_uris, key })
}

/// Resolve a potentially relative URI against the playlist URL.
fn resolve_uri(base: &str, path: &str) -> Result<String> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(path.to_string());
    }

    let base_url = url::Url::parse(base)?;
    let resolved = base_url.join(path)?;
    Ok(resolved.to_string())
}

/// Parse an `IV=0x...` attribute value, left-padded to the block size.
fn parse_iv(value: &str) -> Option<[u8; BLOCK_SIZE]> {
    let hex = value
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if hex.is_empty() || hex.len() > BLOCK_SIZE * 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let padded = format!("{:0>32}", hex);
    let mut iv = [0u8; BLOCK_SIZE];
    for (i, chunk) in padded.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).ok()?;
        iv[i] = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(iv)
}
