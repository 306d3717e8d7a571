//! Episode page URL handling.

use regex::Regex;

use crate::error::{Error, Result};

/// Base URL for episode pages.
pub const VIDEO_URL: &str = "https://hanime.tv/videos/hentai";

/// Build the canonical page URL for an episode slug.
pub fn page_url(slug: &str) -> String {
    format!("{}/{}", VIDEO_URL, slug)
}

/// Extract the episode slug from a hanime.tv video page URL.
///
/// Accepts URLs of the form `https://hanime.tv/videos/hentai/<slug>` where
/// the slug is at least two dash-separated alphanumeric words.
pub fn extract_slug(url: &str) -> Result<String> {
    let pattern =
        Regex::new(r"^https://hanime\.tv/videos/hentai/([A-Za-z0-9]+(?:-[A-Za-z0-9]+)+)/?$")
            .unwrap();

    let url = url.trim();
    pattern
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|slug| slug.as_str().to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_slug_from_page_url() {
        assert_eq!(
            extract_slug("https://hanime.tv/videos/hentai/some-episode-1").unwrap(),
            "some-episode-1"
        );
    }

    #[test]
    fn accepts_trailing_slash_and_whitespace() {
        assert_eq!(
            extract_slug(" https://hanime.tv/videos/hentai/some-episode-1/ ").unwrap(),
            "some-episode-1"
        );
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(extract_slug("https://example.com/videos/hentai/some-episode-1").is_err());
    }

    #[test]
    fn rejects_single_word_slugs() {
        assert!(extract_slug("https://hanime.tv/videos/hentai/browse").is_err());
    }

    #[test]
    fn rejects_non_video_paths() {
        assert!(extract_slug("https://hanime.tv/browse/random-page").is_err());
    }

    #[test]
    fn page_url_round_trips_through_extract_slug() {
        assert_eq!(
            extract_slug(&page_url("some-episode-2")).unwrap(),
            "some-episode-2"
        );
    }
}
